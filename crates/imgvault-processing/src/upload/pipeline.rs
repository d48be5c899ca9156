use std::sync::Arc;

use chrono::Utc;
use imgvault_core::ImageRecord;
use imgvault_storage::ImageStore;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::types::UploadMetadata;
use crate::error::UploadError;
use crate::hash::content_hash;
use crate::image::{DecodedImage, DecoderRegistry};
use crate::validator::UploadValidator;

/// Turns one uploaded stream into one stored image record.
///
/// Every step is a hard gate: the first failure ends the invocation and is returned to
/// the caller unchanged. Nothing is retried and nothing is logged at error level here;
/// reporting is the caller's job.
#[derive(Clone)]
pub struct UploadProcessor {
    store: Arc<dyn ImageStore>,
    registry: Arc<DecoderRegistry>,
    validator: UploadValidator,
}

impl UploadProcessor {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self {
            store,
            registry: Arc::new(DecoderRegistry::standard()),
            validator: UploadValidator::default(),
        }
    }

    pub fn with_registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Process one upload and return the lowercase hex SHA-1 of its bytes.
    ///
    /// The stream is read to the end before anything else touches the payload, so the
    /// whole upload is held in memory for the duration of the call.
    #[tracing::instrument(
        skip(self, reader, metadata),
        fields(filename = %metadata.filename, operation = "process_upload")
    )]
    pub async fn process<R>(
        &self,
        title: &str,
        mut reader: R,
        metadata: UploadMetadata,
    ) -> Result<String, UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.validator
            .validate_all(title, &metadata.declared_content_types)?;

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;

        let hash = content_hash(&data);

        let (decoded, data) = self.decode(data).await?;

        tracing::debug!(
            hash = %hash,
            format = %decoded.format,
            width = decoded.width,
            height = decoded.height,
            size_bytes = data.len(),
            "Upload decoded"
        );

        let record = ImageRecord::new(
            title.to_string(),
            metadata.filename,
            decoded.width,
            decoded.height,
            hash.clone(),
            Utc::now(),
            data,
        );

        self.store.save(record).await?;

        tracing::info!(hash = %hash, "Image upload stored");

        Ok(hash)
    }

    /// Decode on the blocking pool and hand the buffer back for the record.
    async fn decode(&self, data: Vec<u8>) -> Result<(DecodedImage, Vec<u8>), UploadError> {
        let registry = Arc::clone(&self.registry);

        let (result, data) = tokio::task::spawn_blocking(move || {
            let result = registry.decode(&data);
            (result, data)
        })
        .await
        .map_err(std::io::Error::other)?;

        Ok((result?, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{DecodeError, ImageFormat};
    use crate::test_helpers::fixtures::encode_image;
    use crate::test_helpers::mock_store::FailingStore;
    use crate::validator::ValidationError;
    use imgvault_storage::{MemoryImageStore, StorageError};
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Reader that fails on the first poll.
    struct BrokenReader;

    impl AsyncRead for BrokenReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "client went away",
            )))
        }
    }

    fn png_metadata(filename: &str) -> UploadMetadata {
        UploadMetadata::new(filename, vec!["image/png".to_string()])
    }

    fn processor_with_memory_store() -> (UploadProcessor, MemoryImageStore) {
        let store = MemoryImageStore::new();
        let processor = UploadProcessor::new(Arc::new(store.clone()));
        (processor, store)
    }

    #[tokio::test]
    async fn test_process_png_success() {
        let (processor, store) = processor_with_memory_store();
        let data = encode_image(ImageFormat::Png, 2, 2);

        let hash = processor
            .process("cat", data.as_slice(), png_metadata("cat.png"))
            .await
            .unwrap();

        assert_eq!(hash, content_hash(&data));
        assert_eq!(hash.len(), 40);

        let stored = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(stored.title, "cat");
        assert_eq!(stored.original_filename, "cat.png");
        assert_eq!((stored.width, stored.height), (2, 2));
        assert_eq!(stored.size_bytes, data.len() as u64);
        assert_eq!(store.read_content(&hash).await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_process_reports_dimensions_for_each_format() {
        let (processor, store) = processor_with_memory_store();

        for (format, width, height) in [
            (ImageFormat::Jpeg, 16, 8),
            (ImageFormat::Gif, 3, 5),
            (ImageFormat::Png, 7, 1),
        ] {
            let data = encode_image(format, width, height);
            let metadata = UploadMetadata::new(
                format!("image.{}", format.name()),
                vec![format.mime_type().to_string()],
            );

            let hash = processor
                .process("fixture", data.as_slice(), metadata)
                .await
                .unwrap();

            let stored = store.find_by_hash(&hash).await.unwrap().unwrap();
            assert_eq!((stored.width, stored.height), (width, height));
        }
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_empty_title_rejected_before_reading() {
        let (processor, store) = processor_with_memory_store();

        // The reader would fail if touched.
        let err = processor
            .process("", BrokenReader, png_metadata("cat.png"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Validation(ValidationError::TitleMissing)
        ));
        assert_eq!(err.to_string(), "title missing");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_disallowed_content_type_rejected() {
        let (processor, store) = processor_with_memory_store();
        let data = encode_image(ImageFormat::Png, 2, 2);

        let err = processor
            .process(
                "doc",
                data.as_slice(),
                UploadMetadata::new("doc.pdf", vec!["application/pdf".to_string()]),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Validation(ValidationError::InvalidContentType { .. })
        ));
        assert_eq!(err.to_string(), "invalid content-type");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_declared_type_is_trusted_over_payload() {
        let (processor, store) = processor_with_memory_store();
        let data = encode_image(ImageFormat::Png, 4, 3);

        let hash = processor
            .process(
                "mislabelled",
                data.as_slice(),
                UploadMetadata::new("x.gif", vec!["image/gif".to_string()]),
            )
            .await
            .unwrap();

        let stored = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!((stored.width, stored.height), (4, 3));
    }

    #[tokio::test]
    async fn test_non_image_payload_is_decode_error() {
        let (processor, store) = processor_with_memory_store();

        let err = processor
            .process(
                "fake",
                &b"not an image"[..],
                UploadMetadata::new("fake.jpg", vec!["image/jpeg".to_string()]),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Decode(DecodeError::UnknownFormat)
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_truncated_jpeg_is_not_stored() {
        let (processor, store) = processor_with_memory_store();
        let data = encode_image(ImageFormat::Jpeg, 64, 64);
        let truncated = &data[..data.len() * 7 / 8];

        let err = processor
            .process(
                "cut",
                truncated,
                UploadMetadata::new("cut.jpg", vec!["image/jpeg".to_string()]),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Decode(DecodeError::Malformed {
                format: ImageFormat::Jpeg,
                ..
            })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_decode_limit_is_reported_separately() {
        let store = MemoryImageStore::new();
        let mut limits = ::image::Limits::default();
        limits.max_alloc = Some(1024);
        let processor = UploadProcessor::new(Arc::new(store.clone()))
            .with_registry(DecoderRegistry::standard().with_limits(limits));
        let data = encode_image(ImageFormat::Png, 64, 64);

        let err = processor
            .process("big", data.as_slice(), png_metadata("big.png"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Decode(DecodeError::LimitExceeded { .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_payload_is_decode_error() {
        let (processor, _store) = processor_with_memory_store();

        let err = processor
            .process("empty", &b""[..], png_metadata("empty.png"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Decode(DecodeError::UnknownFormat)
        ));
    }

    #[tokio::test]
    async fn test_read_failure_is_io_error() {
        let (processor, store) = processor_with_memory_store();

        let err = processor
            .process("cat", BrokenReader, png_metadata("cat.png"))
            .await
            .unwrap_err();

        match err {
            UploadError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_failure_is_returned_unchanged() {
        let store = Arc::new(FailingStore::new("disk full"));
        let processor = UploadProcessor::new(store.clone());
        let data = encode_image(ImageFormat::Png, 2, 2);

        let err = processor
            .process("cat", data.as_slice(), png_metadata("cat.png"))
            .await
            .unwrap_err();

        match err {
            UploadError::Persistence(StorageError::BackendError(message)) => {
                assert_eq!(message, "disk full")
            }
            other => panic!("expected Persistence, got {other:?}"),
        }
        assert_eq!(store.save_calls(), 1);
    }

    #[tokio::test]
    async fn test_same_bytes_same_hash() {
        let (processor, store) = processor_with_memory_store();
        let data = encode_image(ImageFormat::Gif, 2, 2);
        let metadata = UploadMetadata::new("a.gif", vec!["image/gif".to_string()]);

        let first = processor
            .process("first", data.as_slice(), metadata.clone())
            .await
            .unwrap();
        let second = processor
            .process("second", data.as_slice(), metadata)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_filename_is_not_sanitized() {
        let (processor, store) = processor_with_memory_store();
        let data = encode_image(ImageFormat::Png, 1, 1);

        let hash = processor
            .process("cat", data.as_slice(), png_metadata("../../etc/cat.png"))
            .await
            .unwrap();

        let stored = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(stored.original_filename, "../../etc/cat.png");
    }
}
