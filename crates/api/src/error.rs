use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::CoreError;

use crate::middleware::error_detail::ErrorDetail;

/// Generic message returned for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "message": string }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A malformed request (unparseable body, wrong content type).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error; the text is logged, never sent to clients.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    tracing::debug!(entity, id = %id, "Entity not found");
                    (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
                }
                err @ CoreError::InvalidId { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string(), None)
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERROR_MESSAGE.to_string(),
                        Some(msg),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    Some(msg),
                )
            }
        };

        let mut response = (status, axum::Json(json!({ "message": message }))).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}
