//! Expiring Result Cache Module
//!
//! In-process TTL memoization of a fetch function, keyed by request
//! identifier.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::store::current_timestamp_ms;

// == Cached Result ==
/// A memoized fetch result with TTL metadata.
#[derive(Debug, Clone)]
pub struct CachedResult {
    /// The fetched payload
    pub payload: String,
    /// Fetch timestamp (Unix milliseconds)
    pub fetched_at: u64,
    /// Number of times this entry has been served, including the fetch
    /// that created it
    pub hit_count: u64,
}

impl CachedResult {
    /// Creates a fresh entry for a payload fetched just now.
    pub fn new(payload: String) -> Self {
        Self {
            payload,
            fetched_at: current_timestamp_ms(),
            hit_count: 1,
        }
    }

    /// An entry is fresh while strictly less than `ttl_seconds` have
    /// elapsed since the fetch; at the boundary it is stale.
    pub fn is_fresh(&self, ttl_seconds: u64) -> bool {
        current_timestamp_ms() - self.fetched_at < ttl_seconds * 1000
    }
}

// == Expiring Result Cache ==
/// TTL-based memoization for an arbitrary fetch function.
///
/// Each key is ABSENT, FRESH or STALE. The first request for a key runs
/// the fetch and records the result; further requests within the TTL are
/// served from the cache with `hit_count` incremented; once the TTL has
/// elapsed the next request fetches again and replaces the entry
/// wholesale, resetting `hit_count` to 1.
///
/// The whole map sits behind one lock, released while a fetch is in
/// flight. Two callers observing the same STALE entry may both fetch;
/// the last writer wins, which is an accepted cost (no single-flight).
#[derive(Debug, Default)]
pub struct ExpiringResultCache {
    entries: Mutex<HashMap<String, CachedResult>>,
}

impl ExpiringResultCache {
    // == Constructor ==
    /// Creates an empty result cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, CachedResult>> {
        // A poisoned lock still holds consistent data
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    // == Get Or Fetch ==
    /// Returns the cached payload for `key`, fetching it if the entry is
    /// absent or stale.
    ///
    /// A failing fetch propagates its error and leaves the cache entry
    /// untouched, so no partial or corrupt entry is ever written.
    pub fn get_or_fetch<F>(&self, key: &str, ttl_seconds: u64, fetch: F) -> Result<String>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        {
            let mut entries = self.locked();
            if let Some(entry) = entries.get_mut(key) {
                if entry.is_fresh(ttl_seconds) {
                    entry.hit_count += 1;
                    return Ok(entry.payload.clone());
                }
            }
            // Stale entries are replaced on refresh, not removed here
        }

        let payload = fetch(key)?;
        self.locked()
            .insert(key.to_string(), CachedResult::new(payload.clone()));
        Ok(payload)
    }

    // == Hit Count ==
    /// Returns the hit count recorded for `key`, if an entry exists.
    pub fn hit_count(&self, key: &str) -> Option<u64> {
        self.locked().get(key).map(|entry| entry.hit_count)
    }

    // == Length ==
    /// Returns the number of entries currently held (fresh or stale).
    pub fn len(&self) -> usize {
        self.locked().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }
}
