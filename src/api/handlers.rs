//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::STORE_OP_NAME;
use crate::cache::RandomKeyCache;
use crate::error::{CacheError, Result};
use crate::models::{
    GetResponse, HealthResponse, ReplayResponse, StatsResponse, StoreRequest, StoreResponse,
};
use crate::store::{KeyValueStore, MemoryStore};
use crate::trace::{call_count, instrument, ReplayLog, StoreOp};

/// Application state shared across all handlers.
///
/// Every piece references the same underlying store: the instrumented
/// store operation counts and records into it, the cache reads payloads
/// from it, and the replay log reads histories back out of it.
#[derive(Clone)]
pub struct AppState {
    /// Shared key-value store backend
    pub store: Arc<dyn KeyValueStore>,
    /// Direct (uninstrumented) read access to stored payloads
    pub cache: RandomKeyCache,
    /// Instrumented store operation (history over counting)
    pub store_op: Arc<dyn StoreOp>,
    /// Reader for recorded call histories
    pub replay: Arc<ReplayLog>,
}

impl AppState {
    /// Creates the full state over a shared store.
    ///
    /// Flushes the store as part of cache construction, so the server
    /// always starts from an empty state.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let cache = RandomKeyCache::new(store.clone())?;
        let store_op = instrument(STORE_OP_NAME, cache.clone(), store.clone());
        let replay = ReplayLog::new(store.clone());
        Ok(Self {
            store,
            cache,
            store_op: Arc::new(store_op),
            replay: Arc::new(replay),
        })
    }

    /// Creates the state over a fresh in-memory store.
    pub fn in_memory() -> Result<Self> {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

/// Handler for POST /data
///
/// Stores the payload through the instrumented operation and returns the
/// generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let value = req.to_value().map_err(CacheError::InvalidRequest)?;
    let key = state.store_op.call(&value)?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /data/:key
///
/// Retrieves a stored value by key. A miss surfaces as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get_str(&key)? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /replay/:op
///
/// Renders the recorded call history of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(op): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let log = state.replay.replay(&op)?;
    Ok(Json(ReplayResponse::new(op, log)))
}

/// Handler for GET /stats
///
/// Returns the live key count and the store-operation call counter.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let keys = state.store.dbsize()?;
    let store_calls = call_count(state.store.as_ref(), STORE_OP_NAME)?;
    Ok(Json(StatsResponse::new(keys, store_calls)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_store_and_get_handler() {
        let state = test_state();

        let req = StoreRequest {
            value: json!("test_value"),
        };
        let stored = store_handler(State(state.clone()), Json(req)).await.unwrap();

        let fetched = get_handler(State(state), Path(stored.key.clone()))
            .await
            .unwrap();
        assert_eq!(fetched.value, "test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_rejects_invalid_payload() {
        let state = test_state();

        let req = StoreRequest { value: json!(true) };
        let result = store_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_track_store_calls() {
        let state = test_state();

        for i in 0..3 {
            let req = StoreRequest { value: json!(i) };
            store_handler(State(state.clone()), Json(req)).await.unwrap();
        }

        let stats = stats_handler(State(state)).await.unwrap();
        assert_eq!(stats.store_calls, 3);
        // 3 payload keys + 1 counter + 2 history lists
        assert_eq!(stats.keys, 6);
    }

    #[tokio::test]
    async fn test_replay_handler_renders_history() {
        let state = test_state();

        let req = StoreRequest { value: json!(1) };
        let stored = store_handler(State(state.clone()), Json(req)).await.unwrap();

        let replayed = replay_handler(State(state), Path(STORE_OP_NAME.to_string()))
            .await
            .unwrap();
        assert!(replayed.log.starts_with("cache.store was called 1 times:"));
        assert!(replayed.log.contains(&format!("cache.store(1,) -> {}", stored.key)));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
