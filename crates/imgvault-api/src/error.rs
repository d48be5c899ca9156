//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Every error type that
//! implements `ErrorMetadata` converts into `HttpAppError`, which renders the status,
//! code and body that the metadata describes and logs at the error's own level.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgvault_core::{AppError, ErrorMetadata, LogLevel};
use imgvault_processing::UploadError;
use imgvault_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper carrying any component error to the HTTP layer
///
/// This is necessary because of Rust's orphan rules: `IntoResponse` cannot be
/// implemented for error types that live in other crates.
#[derive(Debug)]
pub struct HttpAppError(Box<dyn ErrorMetadata + Send + Sync>);

impl HttpAppError {
    pub fn inner(&self) -> &(dyn ErrorMetadata + Send + Sync) {
        self.0.as_ref()
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(Box::new(err))
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        HttpAppError(Box::new(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(Box::new(err))
    }
}

/// A form that cannot be parsed is the client's fault.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        AppError::InvalidInput(format!("Invalid multipart body: {}", err.body_text())).into()
    }
}

fn log_error(error: &(dyn ErrorMetadata + Send + Sync)) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl ErrorResponse {
    fn from_error(error: &(dyn ErrorMetadata + Send + Sync), with_details: bool) -> Self {
        Self {
            error: error.client_message(),
            details: with_details.then(|| error.detailed_message()),
            error_type: with_details.then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = self.inner();
        let status = self.status();

        log_error(error);

        // Details never leave the process in production, nor for sensitive errors.
        let with_details = !is_production_env() && !error.is_sensitive();
        let body = ErrorResponse::from_error(error, with_details);

        (status, Json(body)).into_response()
    }
}
