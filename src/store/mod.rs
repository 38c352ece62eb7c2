//! Key-Value Store Module
//!
//! Defines the adapter trait for an external key-value store and an
//! in-memory implementation used by the server binary and tests.

mod memory;

pub use memory::MemoryStore;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

// == Key-Value Store Trait ==
/// Thin adapter over an external key-value store.
///
/// Beyond plain string slots, the trait exposes the list operations used
/// for call-history recording (`rpush`/`lrange`) and the hash-field
/// operations used by the store-backed page cache
/// (`hset`/`hget`/`hincrby`/`expire`/`exists`).
///
/// Implementations take `&self` and are expected to handle their own
/// synchronization; every method is an independent remote call that may
/// fail with [`CacheError::Store`](crate::error::CacheError::Store).
pub trait KeyValueStore: Send + Sync {
    /// Stores raw bytes under a key, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieves the raw bytes for a key. Returns `Ok(None)` on a miss.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Increments the integer stored at `key` by one, treating a missing
    /// key as zero. Returns the new value.
    fn incr(&self, key: &str) -> Result<i64>;

    /// Appends a value to the list stored at `key`, creating the list if
    /// needed. Returns the new list length.
    fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// Returns the list elements between `start` and `stop` inclusive.
    /// Negative indices count from the end, so `(0, -1)` is the whole list.
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Sets a field in the hash stored at `key`.
    fn hset(&self, key: &str, field: &str, value: &[u8]) -> Result<()>;

    /// Retrieves a field from the hash stored at `key`.
    fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>>;

    /// Increments the integer hash field by `delta`, treating a missing
    /// field as zero. Returns the new value.
    fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64>;

    /// Marks a key to expire after `ttl_seconds`.
    fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()>;

    /// Checks whether a key exists (and has not expired).
    fn exists(&self, key: &str) -> Result<bool>;

    /// Drops every key in the store.
    fn flushdb(&self) -> Result<()>;

    /// Returns the number of live keys in the store.
    fn dbsize(&self) -> Result<usize>;
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Returns current Unix timestamp as fractional seconds.
pub fn current_timestamp_secs() -> f64 {
    current_timestamp_ms() as f64 / 1000.0
}
