//! imgvault storage library
//!
//! The persistence collaborator of the upload pipeline: the [`ImageStore`] trait and
//! its local-filesystem and in-memory implementations.
//!
//! # Key format
//!
//! Every record is addressed by its content hash. Backends lay records out as
//! `images/{hash[0..2]}/{hash}` for the payload and `images/{hash[0..2]}/{hash}.json`
//! for the metadata. Key generation lives in the `keys` module so backends agree on it,
//! and it rejects anything that is not a 40-character lowercase hex digest.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use imgvault_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalImageStore;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryImageStore;
pub use traits::{ImageStore, StorageError, StorageResult};
