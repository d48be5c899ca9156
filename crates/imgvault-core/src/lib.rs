//! imgvault core library
//!
//! Domain models, error metadata, configuration and shared constants used by the
//! storage, processing and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ImageRecord, StoredImage};
pub use storage_types::StorageBackend;
