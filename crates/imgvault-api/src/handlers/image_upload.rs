use std::io;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::Field, Multipart, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::TryStreamExt;
use imgvault_core::AppError;
use imgvault_processing::{UploadError, UploadMetadata};
use serde::Serialize;
use tokio_util::io::StreamReader;

use crate::constants::{FILE_FIELD, TITLE_FIELD};
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub hash: String,
}

/// Upload image handler
///
/// Reads the form in order. When the `title` field precedes the first `file` part,
/// the file is streamed straight into the upload processor. Otherwise the file part
/// is buffered while the rest of the form is read for its title. Later `file` parts
/// are ignored.
///
/// # Returns
/// `{"hash": "..."}` with HTTP 201 Created
///
/// # Errors
/// - `UploadError::Validation` / `UploadError::Decode` - 400
/// - `UploadError::Io` / `UploadError::Persistence` - 500
/// - `AppError::InvalidInput` - malformed form or no file part
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut title: Option<String> = None;
    let mut buffered: Option<(Bytes, UploadMetadata)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == TITLE_FIELD {
            title = Some(field.text().await?);
        } else if name == FILE_FIELD && buffered.is_none() {
            let metadata = upload_metadata(&field);

            if let Some(title) = title.as_deref() {
                tracing::debug!(
                    filename = %metadata.filename,
                    content_types = ?metadata.declared_content_types,
                    "Streaming file part into processor"
                );
                let reader = StreamReader::new(Box::pin(field.map_err(io::Error::other)));
                let hash = state.processor.process(title, reader, metadata).await?;
                return Ok(created(hash));
            }

            tracing::debug!(
                filename = %metadata.filename,
                "File part precedes title, buffering"
            );
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Io(io::Error::other(e)))?;
            buffered = Some((data, metadata));
        } else {
            tracing::debug!(field = %name, "Skipping multipart field");
        }
    }

    let (data, metadata) =
        buffered.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    let hash = state
        .processor
        .process(title.as_deref().unwrap_or_default(), &data[..], metadata)
        .await?;

    Ok(created(hash))
}

fn created(hash: String) -> (StatusCode, Json<UploadResponse>) {
    (StatusCode::CREATED, Json(UploadResponse { hash }))
}

fn upload_metadata(field: &Field<'_>) -> UploadMetadata {
    let declared_content_types = field
        .headers()
        .get_all(CONTENT_TYPE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(String::from)
        .collect();

    UploadMetadata::new(
        field.file_name().unwrap_or_default(),
        declared_content_types,
    )
}
