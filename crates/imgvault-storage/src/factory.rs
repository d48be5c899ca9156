#[cfg(feature = "storage-local")]
use crate::LocalImageStore;
#[cfg(feature = "storage-memory")]
use crate::MemoryImageStore;
use crate::{ImageStore, StorageBackend, StorageError, StorageResult};
use imgvault_core::Config;
use std::sync::Arc;

/// Create an image store based on configuration
pub async fn create_store(config: &Config) -> StorageResult<Arc<dyn ImageStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;

            let store = LocalImageStore::new(base_path).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryImageStore::new())),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}
