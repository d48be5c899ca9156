use crate::keys::validate_hash;
use crate::traits::{ImageStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use imgvault_core::{ImageRecord, StoredImage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process image store. Contents are lost when the process exits.
#[derive(Clone, Default)]
pub struct MemoryImageStore {
    images: Arc<RwLock<HashMap<String, (StoredImage, Bytes)>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn save(&self, record: ImageRecord) -> StorageResult<()> {
        validate_hash(&record.hash)?;

        let (stored, content) = record.into_parts();
        tracing::debug!(
            hash = %stored.hash,
            size_bytes = stored.size_bytes,
            "Memory image store save"
        );

        self.images
            .write()
            .await
            .insert(stored.hash.clone(), (stored, Bytes::from(content)));
        Ok(())
    }

    async fn find_by_hash(&self, hash: &str) -> StorageResult<Option<StoredImage>> {
        validate_hash(hash)?;
        Ok(self
            .images
            .read()
            .await
            .get(hash)
            .map(|(stored, _)| stored.clone()))
    }

    async fn read_content(&self, hash: &str) -> StorageResult<Vec<u8>> {
        validate_hash(hash)?;
        self.images
            .read()
            .await
            .get(hash)
            .map(|(_, content)| content.to_vec())
            .ok_or_else(|| StorageError::NotFound(hash.to_string()))
    }

    async fn exists(&self, hash: &str) -> StorageResult<bool> {
        validate_hash(hash)?;
        Ok(self.images.read().await.contains_key(hash))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
