//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the round-trip, counting and history
//! correctness properties, plus a key-uniqueness check.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{RandomKeyCache, Value};
use crate::store::{KeyValueStore, MemoryStore};
use crate::trace::{call_count, instrument, ReplayLog, StoreOp};

// == Strategies ==
/// Generates arbitrary scalar/byte payloads.
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,64}".prop_map(Value::Str),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
        any::<i64>().prop_map(Value::Int),
    ]
}

fn new_cache() -> (Arc<MemoryStore>, RandomKeyCache) {
    let store = Arc::new(MemoryStore::new());
    let cache = RandomKeyCache::new(store.clone()).unwrap();
    (store, cache)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any scalar/byte payload, storing and retrieving returns the
    // exact bytes that were written.
    #[test]
    fn prop_roundtrip_storage(value in value_strategy()) {
        let (_store, cache) = new_cache();

        let key = cache.store(&value).unwrap();
        let retrieved = cache.get(&key).unwrap();

        prop_assert_eq!(retrieved, Some(value.to_bytes()), "Round-trip value mismatch");
    }

    // A key that was never stored reads back as a miss, never an error.
    #[test]
    fn prop_unknown_key_is_miss(key in "[a-f0-9-]{1,64}") {
        let (_store, cache) = new_cache();
        prop_assert_eq!(cache.get(&key).unwrap(), None);
    }

    // After N instrumented calls the counter reads N and the history
    // lists hold N entries each.
    #[test]
    fn prop_counter_and_history_track_calls(values in prop::collection::vec(value_strategy(), 1..20)) {
        let (store, cache) = new_cache();
        let op = instrument("op", cache, store.clone());

        for value in &values {
            op.call(value).unwrap();
        }

        let n = values.len();
        prop_assert_eq!(call_count(store.as_ref(), "op").unwrap(), n as u64);
        prop_assert_eq!(store.lrange("op:inputs", 0, -1).unwrap().len(), n);
        prop_assert_eq!(store.lrange("op:outputs", 0, -1).unwrap().len(), n);
    }

    // The replay rendering always has one summary line plus one line per
    // recorded call, each echoing the operation name.
    #[test]
    fn prop_replay_line_count(values in prop::collection::vec(value_strategy(), 0..10)) {
        let (store, cache) = new_cache();
        let op = instrument("op", cache, store.clone());

        for value in &values {
            op.call(value).unwrap();
        }

        let rendered = ReplayLog::new(store).replay("op").unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        prop_assert_eq!(lines.len(), values.len() + 1);
        prop_assert_eq!(lines[0], format!("op was called {} times:", values.len()));
        for line in &lines[1..] {
            prop_assert!(line.starts_with("op("), "history line missing op name: {}", line);
        }
    }
}

// == Key Uniqueness ==
/// 10,000 freshly generated keys never collide.
#[test]
fn test_generated_keys_are_unique() {
    let (_store, cache) = new_cache();

    let mut keys = HashSet::new();
    for _ in 0..10_000 {
        let key = cache.store(&Value::from("x")).unwrap();
        assert!(keys.insert(key), "generated key collided");
    }
    assert_eq!(keys.len(), 10_000);
}
