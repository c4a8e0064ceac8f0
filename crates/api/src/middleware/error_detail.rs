//! Development-mode error detail for 500 responses.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::INTERNAL_ERROR_MESSAGE;

/// Underlying error text of an internal error, attached to the response
/// as an extension by [`AppError`](crate::error::AppError).
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Rewrite responses carrying an [`ErrorDetail`] into
/// `{ "message": ..., "error": detail }`.
///
/// Only mounted when the server runs in development mode; otherwise the
/// extension is ignored and clients see the generic message alone.
pub async fn expose_error_detail(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let status = response.status();
    (
        status,
        Json(json!({ "message": INTERNAL_ERROR_MESSAGE, "error": detail })),
    )
        .into_response()
}
