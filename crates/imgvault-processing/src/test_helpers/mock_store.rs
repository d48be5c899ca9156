//! Store double that fails every save.

use async_trait::async_trait;
use imgvault_core::{ImageRecord, StoredImage};
use imgvault_storage::{ImageStore, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rejects every save with `StorageError::BackendError(message)`.
#[derive(Default)]
pub struct FailingStore {
    pub message: String,
    pub save_calls: AtomicUsize,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            save_calls: AtomicUsize::new(0),
        }
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageStore for FailingStore {
    async fn save(&self, _record: ImageRecord) -> StorageResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::BackendError(self.message.clone()))
    }

    async fn find_by_hash(&self, _hash: &str) -> StorageResult<Option<StoredImage>> {
        Ok(None)
    }

    async fn read_content(&self, hash: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(hash.to_string()))
    }

    async fn exists(&self, _hash: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
