//! Upload pipeline errors

use imgvault_core::{ErrorMetadata, LogLevel};
use imgvault_storage::StorageError;

use crate::image::DecodeError;
use crate::validator::ValidationError;

/// Failure of one step of the upload pipeline.
///
/// Variants keep the kind of the failing step so callers can tell a client fault
/// (validation, undecodable payload) from a server fault (stream read, storage).
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Returned exactly as the store produced it.
    #[error(transparent)]
    Persistence(#[from] StorageError),
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn upload_error_static_metadata(err: &UploadError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        UploadError::Validation(_) => (400, "VALIDATION_ERROR", false, false, LogLevel::Debug),
        UploadError::Io(_) => (500, "IO_ERROR", true, true, LogLevel::Error),
        UploadError::Decode(DecodeError::LimitExceeded { .. }) => {
            (413, "IMAGE_TOO_LARGE", false, false, LogLevel::Warn)
        }
        UploadError::Decode(_) => (400, "IMAGE_DECODE_ERROR", false, false, LogLevel::Warn),
        UploadError::Persistence(_) => (500, "STORAGE_ERROR", true, true, LogLevel::Error),
    }
}

impl ErrorMetadata for UploadError {
    fn http_status_code(&self) -> u16 {
        upload_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        upload_error_static_metadata(self).1
    }

    fn error_type(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "Validation",
            UploadError::Io(_) => "Io",
            UploadError::Decode(_) => "Decode",
            UploadError::Persistence(_) => "Persistence",
        }
    }

    fn is_recoverable(&self) -> bool {
        upload_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::Validation(e) => e.to_string(),
            UploadError::Io(_) => "Failed to read uploaded file".to_string(),
            UploadError::Decode(e) => e.to_string(),
            UploadError::Persistence(_) => "Failed to store image".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        upload_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        upload_error_static_metadata(self).4
    }
}
