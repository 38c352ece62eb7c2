//! Error types for the caching toolkit
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching toolkit.
///
/// A missing key is NOT an error: lookups report misses as `Ok(None)`.
/// Only store-level failures, decode failures and fetch failures are
/// exceptional.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend store failure (connectivity, wrong slot type, serialization)
    #[error("Store error: {0}")]
    Store(String),

    /// A decode function rejected the raw bytes it was given
    #[error("Decode error: {0}")]
    Decode(String),

    /// The upstream fetch function failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation not supported by this store implementation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Key not found (only surfaced at the API boundary, where a miss
    /// becomes a 404)
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            CacheError::Decode(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            CacheError::Fetch(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Unsupported(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching toolkit.
pub type Result<T> = std::result::Result<T, CacheError>;
