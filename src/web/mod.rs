//! Web Page Cache Module
//!
//! Store-backed variant of the expiring result cache: memoizes the body
//! of a fetched page in the key-value store itself, using one hash per
//! URL with `content`, `timestamp` and `count` fields.

use std::sync::Arc;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{current_timestamp_secs, KeyValueStore};

/// Default TTL in seconds for cached pages.
pub const DEFAULT_PAGE_TTL: u64 = 10;

// == Page Cache ==
/// TTL cache for fetched page bodies, persisted in the key-value store.
///
/// Each URL maps to the hash key `cache:{url}`. Unlike
/// [`ExpiringResultCache`](crate::cache::ExpiringResultCache) the entry
/// also carries a store-level expiry, so a stale hash disappears from the
/// store on its own.
pub struct PageCache {
    store: Arc<dyn KeyValueStore>,
    ttl_seconds: u64,
}

impl PageCache {
    // == Constructor ==
    pub fn new(store: Arc<dyn KeyValueStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    fn cache_key(url: &str) -> String {
        format!("cache:{}", url)
    }

    // == Get Page ==
    /// Returns the body for `url`, fetching it if no fresh cached copy
    /// exists.
    ///
    /// A cache hit increments the `count` field; a refresh overwrites the
    /// entry wholesale and resets `count` to 1. A failing fetch
    /// propagates without touching the stored entry.
    pub fn get_page<F>(&self, url: &str, fetch: F) -> Result<String>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let key = Self::cache_key(url);

        if self.store.exists(&key)? {
            if let Some(raw_ts) = self.store.hget(&key, "timestamp")? {
                let fetched_at: f64 = std::str::from_utf8(&raw_ts)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        CacheError::Store(format!("corrupt timestamp for '{}'", key))
                    })?;

                if current_timestamp_secs() - fetched_at < self.ttl_seconds as f64 {
                    if let Some(content) = self.store.hget(&key, "content")? {
                        self.store.hincrby(&key, "count", 1)?;
                        debug!(url, "page cache hit");
                        return String::from_utf8(content).map_err(|e| {
                            CacheError::Decode(format!("invalid utf-8 in cached page: {}", e))
                        });
                    }
                }
            }
        }

        debug!(url, "page cache miss, fetching");
        let body = fetch(url)?;

        self.store.hset(&key, "content", body.as_bytes())?;
        self.store.hset(&key, "count", b"1")?;
        self.store
            .hset(&key, "timestamp", current_timestamp_secs().to_string().as_bytes())?;
        self.store.expire(&key, self.ttl_seconds)?;

        Ok(body)
    }

    // == Hit Count ==
    /// Returns the recorded hit count for `url`, zero if nothing is
    /// cached.
    pub fn hit_count(&self, url: &str) -> Result<i64> {
        match self.store.hget(&Self::cache_key(url), "count")? {
            Some(raw) => Ok(std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0)),
            None => Ok(0),
        }
    }
}

// == Page Fetcher ==
/// Fetches the body of a page over HTTP.
///
/// Synchronous and blocking; network failures surface as
/// [`CacheError::Fetch`]. Pair with [`PageCache::get_page`]:
///
/// ```ignore
/// let body = page_cache.get_page("http://example.com", fetch_page)?;
/// ```
pub fn fetch_page(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| CacheError::Fetch(format!("GET {} failed: {}", url, e)))?;
    response
        .text()
        .map_err(|e| CacheError::Fetch(format!("reading body of {} failed: {}", url, e)))
}
