use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Empty documents are not an error: they score low and match nothing.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Upload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::UnsupportedFormat(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            AppError::CorruptDocument(_) => (StatusCode::UNPROCESSABLE_ENTITY, "CORRUPT_DOCUMENT"),
            AppError::UnsupportedLanguage(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_LANGUAGE")
            }
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::UnsupportedFormat(msg) => {
                tracing::warn!("Unsupported format: {msg}");
                format!("Unsupported document format '{msg}'. Upload a PDF or LaTeX (.tex) resume.")
            }
            AppError::CorruptDocument(msg) => {
                tracing::warn!("Corrupt document: {msg}");
                format!("The document could not be read: {msg}")
            }
            AppError::UnsupportedLanguage(language) => {
                tracing::warn!("Rejected non-English resume: {language}");
                format!("Only English resumes are supported; this one reads as {language}.")
            }
            AppError::PayloadTooLarge(limit) => {
                tracing::warn!("Upload rejected: exceeds {limit} bytes");
                format!("The upload exceeds the {limit} byte limit.")
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
