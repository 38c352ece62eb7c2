//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `POST /data` - Store a payload under a freshly generated key
//! - `GET /data/:key` - Retrieve a stored value by key
//! - `GET /replay/:op` - Render the recorded call history of an operation
//! - `GET /stats` - Store size and call counter
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

/// Operation name the server registers its instrumented store under.
pub const STORE_OP_NAME: &str = "cache.store";
