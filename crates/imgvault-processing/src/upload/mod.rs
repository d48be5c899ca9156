//! Upload pipeline: validate → buffer → hash → decode → store.

pub mod pipeline;
pub mod types;

pub use pipeline::UploadProcessor;
pub use types::UploadMetadata;
