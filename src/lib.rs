//! Keytrace - a key-value caching toolkit with call tracing
//!
//! Provides random-key payload storage, invocation counting and history
//! replay, TTL-based result memoization, and thin document-store helpers.

pub mod api;
pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod models;
pub mod store;
pub mod trace;
pub mod web;

pub use api::AppState;
pub use config::Config;
