//! Request extractors and response middleware.
//!
//! - [`json::JsonBody`] -- JSON body extractor that rejects with the `{ "message" }` envelope.
//! - [`error_detail::expose_error_detail`] -- development-only `"error"` field on 500 responses.

pub mod error_detail;
pub mod json;
