//! Store doubles for failure paths.

use async_trait::async_trait;
use imgvault_core::{ImageRecord, StoredImage};
use imgvault_storage::{ImageStore, StorageBackend, StorageError, StorageResult};

/// Accepts lookups but fails every save.
pub struct ReadOnlyStore;

#[async_trait]
impl ImageStore for ReadOnlyStore {
    async fn save(&self, _record: ImageRecord) -> StorageResult<()> {
        Err(StorageError::BackendError("store is read-only".to_string()))
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
