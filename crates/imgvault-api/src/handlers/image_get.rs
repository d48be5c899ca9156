use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use imgvault_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[tracing::instrument(skip(state), fields(operation = "get_image"))]
pub async fn get_image(
    Path(hash): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let image = state
        .store
        .find_by_hash(&hash)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    Ok(Json(image))
}

/// Raw image bytes. The content type comes from the payload's signature, not from
/// what the uploader declared.
#[tracing::instrument(skip(state), fields(operation = "get_image_content"))]
pub async fn get_image_content(
    Path(hash): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let data = state.store.read_content(&hash).await?;

    let content_type = state
        .processor
        .registry()
        .detect(&data)
        .map(|format| format.mime_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE);

    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
