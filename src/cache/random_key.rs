//! Random-Key Cache Module
//!
//! Stores arbitrary scalar payloads under freshly generated UUID keys.

use std::sync::Arc;

use uuid::Uuid;

use crate::cache::Value;
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Random-Key Cache ==
/// Stores payloads in the key-value store under random 128-bit keys.
///
/// Construction flushes the backing store: the cache starts from a known
/// empty state, which is part of its contract (and what makes stored keys
/// collision-free by construction).
#[derive(Clone)]
pub struct RandomKeyCache {
    store: Arc<dyn KeyValueStore>,
}

impl RandomKeyCache {
    // == Constructor ==
    /// Creates a new cache over the given store, flushing it first.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.flushdb()?;
        Ok(Self { store })
    }

    // == Store ==
    /// Writes the payload under a freshly generated UUID v4 key and
    /// returns the key.
    pub fn store(&self, data: &Value) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &data.to_bytes())?;
        Ok(key)
    }

    // == Get ==
    /// Reads the raw bytes for a key. A missing key is a normal miss,
    /// reported as `Ok(None)`.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key)
    }

    // == Get With Decoder ==
    /// Reads the bytes for a key and applies `decode` to them.
    ///
    /// Decode failures propagate as errors; they are never swallowed or
    /// defaulted. A miss short-circuits to `Ok(None)` without invoking
    /// the decoder.
    pub fn get_with<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&[u8]) -> Result<T>,
    ) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    // == Get String ==
    /// Reads the value for a key as a UTF-8 string.
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw.to_vec())
                .map_err(|e| CacheError::Decode(format!("invalid utf-8: {}", e)))
        })
    }

    // == Get Integer ==
    /// Reads the value for a key as a base-10 integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(raw)
                .map_err(|e| CacheError::Decode(format!("invalid utf-8: {}", e)))?
                .parse::<i64>()
                .map_err(|e| CacheError::Decode(format!("invalid integer: {}", e)))
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_cache() -> RandomKeyCache {
        RandomKeyCache::new(Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_store_and_get_roundtrip() {
        let cache = new_cache();

        let key = cache.store(&Value::from("hello")).unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_get_unknown_key_is_none() {
        let cache = new_cache();
        assert_eq!(cache.get("no-such-key").unwrap(), None);
    }

    #[test]
    fn test_get_str() {
        let cache = new_cache();

        let key = cache.store(&Value::from("bonjour")).unwrap();
        assert_eq!(cache.get_str(&key).unwrap(), Some("bonjour".to_string()));
    }

    #[test]
    fn test_get_int() {
        let cache = new_cache();

        let key = cache.store(&Value::from(123i64)).unwrap();
        assert_eq!(cache.get_int(&key).unwrap(), Some(123));
    }

    #[test]
    fn test_get_int_decode_failure_propagates() {
        let cache = new_cache();

        let key = cache.store(&Value::from("not a number")).unwrap();
        assert!(matches!(cache.get_int(&key), Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_get_str_invalid_utf8_propagates() {
        let cache = new_cache();

        let key = cache.store(&Value::Bytes(vec![0xff, 0xfe])).unwrap();
        assert!(matches!(cache.get_str(&key), Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decoder_not_invoked_on_miss() {
        let cache = new_cache();

        let result = cache
            .get_with("missing", |_| -> Result<String> {
                panic!("decoder must not run on a miss")
            })
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_construction_flushes_store() {
        let store = Arc::new(MemoryStore::new());
        store.set("leftover", b"stale").unwrap();

        let cache = RandomKeyCache::new(store).unwrap();
        assert_eq!(cache.get("leftover").unwrap(), None);
    }

    #[test]
    fn test_float_roundtrip() {
        let cache = new_cache();

        let key = cache.store(&Value::from(2.75f64)).unwrap();
        assert_eq!(cache.get_str(&key).unwrap(), Some("2.75".to_string()));
    }
}
