use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use refshoot_core::error::CoreError;
use refshoot_core::validation::FileValidationError;
use refshoot_imagegen::ImageGenError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`ImageGenError`] and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `refshoot_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure talking to the image provider or decoding an upload.
    #[error(transparent)]
    ImageGen(#[from] ImageGenError),

    /// Uploaded files that failed filename validation.
    #[error("{} uploaded file(s) failed validation", .0.len())]
    InvalidFiles(Vec<FileValidationError>),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::MissingUpload { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MISSING_UPLOAD",
                    core.to_string(),
                ),
            },

            // --- Image provider errors ---
            AppError::ImageGen(err) => classify_imagegen_error(err),

            // --- Upload validation ---
            AppError::InvalidFiles(errors) => {
                let body = json!({
                    "error": self.to_string(),
                    "code": "INVALID_FILES",
                    "errors": errors,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an image-generation error into an HTTP status, error code, and
/// message.
///
/// - Undecodable uploads map to 400.
/// - A provider request past its deadline maps to 504.
/// - Provider and transport failures map to 502 with the upstream message.
fn classify_imagegen_error(err: &ImageGenError) -> (StatusCode, &'static str, String) {
    match err {
        ImageGenError::Decode(e) => (
            StatusCode::BAD_REQUEST,
            "IMAGE_DECODE_ERROR",
            format!("Uploaded image could not be decoded: {e}"),
        ),
        ImageGenError::Timeout(_) => {
            tracing::error!(error = %err, "Image provider timed out");
            (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Image provider error");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", other.to_string())
        }
    }
}
