//! Replay Module
//!
//! Reads back the recorded history of a named operation and renders it.

use std::sync::Arc;

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::trace::{INPUTS_SUFFIX, OUTPUTS_SUFFIX};

// == Replay Log ==
/// Renders the recorded call history of an operation.
pub struct ReplayLog {
    store: Arc<dyn KeyValueStore>,
}

impl ReplayLog {
    // == Constructor ==
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // == Replay ==
    /// Renders the history of `op_name` as one summary line followed by
    /// one line per recorded call:
    ///
    /// ```text
    /// op was called 2 times:
    /// op(1,) -> a
    /// op(2,) -> b
    /// ```
    ///
    /// The call count in the summary is the number of recorded inputs,
    /// which can diverge from the invocation counter when counting and
    /// history are applied independently. Inputs and outputs are paired
    /// by index up to the shorter list, so a history left uneven by a
    /// failed call renders without its missing output.
    ///
    /// Pure read operation; nothing in the store is modified.
    pub fn replay(&self, op_name: &str) -> Result<String> {
        let inputs = self
            .store
            .lrange(&format!("{}{}", op_name, INPUTS_SUFFIX), 0, -1)?;
        let outputs = self
            .store
            .lrange(&format!("{}{}", op_name, OUTPUTS_SUFFIX), 0, -1)?;

        let mut rendered = format!("{} was called {} times:", op_name, inputs.len());
        for (input, output) in inputs.iter().zip(outputs.iter()) {
            rendered.push('\n');
            rendered.push_str(&format!(
                "{}{} -> {}",
                op_name,
                String::from_utf8_lossy(input),
                String::from_utf8_lossy(output)
            ));
        }
        Ok(rendered)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_with_history(op: &str, pairs: &[(&str, &str)]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for (input, output) in pairs {
            store
                .rpush(&format!("{}:inputs", op), input.as_bytes())
                .unwrap();
            store
                .rpush(&format!("{}:outputs", op), output.as_bytes())
                .unwrap();
        }
        store
    }

    #[test]
    fn test_replay_format_exact() {
        let store = store_with_history("op", &[("(1,)", "a"), ("(2,)", "b")]);
        let log = ReplayLog::new(store);

        let rendered = log.replay("op").unwrap();
        assert_eq!(rendered, "op was called 2 times:\nop(1,) -> a\nop(2,) -> b");
    }

    #[test]
    fn test_replay_empty_history() {
        let store = Arc::new(MemoryStore::new());
        let log = ReplayLog::new(store);

        let rendered = log.replay("op").unwrap();
        assert_eq!(rendered, "op was called 0 times:");
    }

    #[test]
    fn test_replay_pairs_by_shorter_list() {
        // One more input than outputs, as left behind by a failed call
        let store = store_with_history("op", &[("(1,)", "a")]);
        store.rpush("op:inputs", b"(2,)").unwrap();
        let log = ReplayLog::new(store);

        let rendered = log.replay("op").unwrap();
        // Summary counts inputs; the unmatched input renders no line
        assert_eq!(rendered, "op was called 2 times:\nop(1,) -> a");
    }

    #[test]
    fn test_replay_does_not_mutate_history() {
        let store = store_with_history("op", &[("(1,)", "a")]);
        let log = ReplayLog::new(store.clone());

        log.replay("op").unwrap();
        log.replay("op").unwrap();

        assert_eq!(store.lrange("op:inputs", 0, -1).unwrap().len(), 1);
        assert_eq!(store.lrange("op:outputs", 0, -1).unwrap().len(), 1);
    }

    #[test]
    fn test_replay_end_to_end_with_instrumented_op() {
        use crate::cache::{RandomKeyCache, Value};
        use crate::trace::{instrument, StoreOp};

        let store = Arc::new(MemoryStore::new());
        let cache = RandomKeyCache::new(store.clone()).unwrap();
        let op = instrument("cache.store", cache, store.clone());
        let key = op.call(&Value::from("first")).unwrap();

        let rendered = ReplayLog::new(store).replay("cache.store").unwrap();
        assert!(rendered.starts_with("cache.store was called 1 times:"));
        assert!(rendered.contains(&format!("cache.store(\"first\",) -> {}", key)));
    }
}
