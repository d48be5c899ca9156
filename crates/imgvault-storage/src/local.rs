use crate::keys::{content_key, metadata_key};
use crate::traits::{ImageStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use imgvault_core::{ImageRecord, StoredImage};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem image store
#[derive(Clone, Debug)]
pub struct LocalImageStore {
    base_path: PathBuf,
}

impl LocalImageStore {
    /// Create a new LocalImageStore rooted at `base_path` (e.g. "/var/lib/imgvault").
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalImageStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, storage_key: &str) -> PathBuf {
        self.base_path.join(storage_key)
    }

    /// Write `data` to `path` through a uniquely named sibling temp file so readers
    /// never observe a partially written file, even with concurrent saves of one hash.
    /// The parent directory is synced after the rename so the new entry survives a crash.
    async fn write_atomic(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey(path.display().to_string()))?;
        fs::create_dir_all(parent).await?;

        let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));

        let written: std::io::Result<()> = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp_path, path).await?;
            sync_dir(parent).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}

/// Flush a directory's entries to disk.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

/// Directories cannot be opened as files here; rename durability is left to the OS.
#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, record: ImageRecord) -> StorageResult<()> {
        let content_path = self.key_to_path(&content_key(&record.hash)?);
        let metadata_path = self.key_to_path(&metadata_key(&record.hash)?);
        let start = std::time::Instant::now();

        let (stored, content) = record.into_parts();
        let metadata = serde_json::to_vec_pretty(&stored)?;

        // Payload first: a metadata file marks a complete record.
        self.write_atomic(&content_path, &content).await?;
        self.write_atomic(&metadata_path, &metadata).await?;

        tracing::info!(
            path = %content_path.display(),
            hash = %stored.hash,
            size_bytes = stored.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local image store save successful"
        );

        Ok(())
    }

    async fn find_by_hash(&self, hash: &str) -> StorageResult<Option<StoredImage>> {
        let path = self.key_to_path(&metadata_key(hash)?);

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Some(serde_json::from_slice(&raw)?))
    }

    async fn read_content(&self, hash: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(&content_key(hash)?);
        let start = std::time::Instant::now();

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(hash.to_string()))
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            hash = %hash,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local image store read successful"
        );

        Ok(data)
    }

    async fn exists(&self, hash: &str) -> StorageResult<bool> {
        let path = self.key_to_path(&metadata_key(hash)?);
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
