//! Storage abstraction trait
//!
//! This module defines the `ImageStore` trait that all persistence backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use imgvault_core::{ErrorMetadata, ImageRecord, LogLevel, StoredImage};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metadata serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorMetadata for StorageError {
    fn http_status_code(&self) -> u16 {
        match self {
            StorageError::NotFound(_) => 404,
            StorageError::InvalidKey(_) => 400,
            _ => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "NOT_FOUND",
            StorageError::InvalidKey(_) => "INVALID_HASH",
            _ => "STORAGE_ERROR",
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            StorageError::UploadFailed(_) => "UploadFailed",
            StorageError::DownloadFailed(_) => "DownloadFailed",
            StorageError::NotFound(_) => "NotFound",
            StorageError::InvalidKey(_) => "InvalidKey",
            StorageError::BackendError(_) => "BackendError",
            StorageError::IoError(_) => "IoError",
            StorageError::ConfigError(_) => "ConfigError",
            StorageError::Serialization(_) => "Serialization",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            StorageError::NotFound(_) | StorageError::InvalidKey(_) | StorageError::ConfigError(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            StorageError::NotFound(_) => "Image not found".to_string(),
            StorageError::InvalidKey(_) => {
                "Image hash must be 40 lowercase hexadecimal characters".to_string()
            }
            _ => "Failed to access storage".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        !matches!(self, StorageError::NotFound(_) | StorageError::InvalidKey(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }
}

/// Persistence collaborator for uploaded images
///
/// Backends store the structured fields and the raw payload of a record, keyed by its
/// content hash so the hash handed back to clients resolves to the record again.
/// Concurrency control between simultaneous saves is the backend's responsibility.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Durably store the record and its payload. Takes ownership: the payload is not
    /// retained by the caller once this returns.
    async fn save(&self, record: ImageRecord) -> StorageResult<()>;

    /// Look up the stored fields for a content hash.
    async fn find_by_hash(&self, hash: &str) -> StorageResult<Option<StoredImage>>;

    /// Read the raw payload for a content hash.
    async fn read_content(&self, hash: &str) -> StorageResult<Vec<u8>>;

    /// Check if a record exists for a content hash
    async fn exists(&self, hash: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
