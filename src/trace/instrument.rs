//! Call Instrumentation Module
//!
//! Composable wrappers that count invocations and record ordered
//! input/output history for a named store operation.
//!
//! Counters live in the key-value store under the operation name itself;
//! history lives in two parallel lists under `{name}:inputs` and
//! `{name}:outputs`. Counter increment and history appends are independent
//! store calls with no atomicity across them: a delegate failure leaves
//! the outputs list one entry short, which consumers must tolerate.

use std::sync::Arc;

use crate::cache::{RandomKeyCache, Value};
use crate::error::Result;
use crate::store::KeyValueStore;
use crate::trace::{INPUTS_SUFFIX, OUTPUTS_SUFFIX};

// == Store Operation Trait ==
/// A named operation that writes a payload and yields the key it was
/// stored under.
///
/// The name is an explicit, stable identifier assigned at construction
/// time; it keys the counter and history lists in the store.
pub trait StoreOp: Send + Sync {
    /// Stable identifier for this operation.
    fn name(&self) -> &str;

    /// Performs the operation.
    fn call(&self, data: &Value) -> Result<String>;
}

// == Base Operation ==
/// The base store operation: a named wrapper around
/// [`RandomKeyCache::store`].
pub struct CacheStoreOp {
    name: String,
    cache: RandomKeyCache,
}

impl CacheStoreOp {
    pub fn new(name: impl Into<String>, cache: RandomKeyCache) -> Self {
        Self {
            name: name.into(),
            cache,
        }
    }
}

impl StoreOp for CacheStoreOp {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, data: &Value) -> Result<String> {
        self.cache.store(data)
    }
}

// == Call Counting ==
/// Counts invocations of the wrapped operation.
///
/// Each call increments the store counter held under the operation name,
/// then delegates. The counter survives for the store's lifetime and is
/// only reset by an explicit flush.
pub struct CallCounted<O> {
    inner: O,
    store: Arc<dyn KeyValueStore>,
}

impl<O: StoreOp> CallCounted<O> {
    pub fn new(inner: O, store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, store }
    }
}

impl<O: StoreOp> StoreOp for CallCounted<O> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call(&self, data: &Value) -> Result<String> {
        self.store.incr(self.inner.name())?;
        self.inner.call(data)
    }
}

// == Call History ==
/// Records the ordered input/output history of the wrapped operation.
///
/// The input repr is appended before delegating and the output after, so
/// a failing delegate leaves the input recorded with no matching output.
/// That mismatch is observable by design; [`ReplayLog`] pairs entries by
/// the shorter of the two lists.
///
/// [`ReplayLog`]: crate::trace::ReplayLog
pub struct CallHistory<O> {
    inner: O,
    store: Arc<dyn KeyValueStore>,
}

impl<O: StoreOp> CallHistory<O> {
    pub fn new(inner: O, store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, store }
    }
}

impl<O: StoreOp> StoreOp for CallHistory<O> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call(&self, data: &Value) -> Result<String> {
        let name = self.inner.name();
        self.store
            .rpush(&format!("{}{}", name, INPUTS_SUFFIX), data.args_repr().as_bytes())?;
        let output = self.inner.call(data)?;
        self.store
            .rpush(&format!("{}{}", name, OUTPUTS_SUFFIX), output.as_bytes())?;
        Ok(output)
    }
}

// == Composition ==
/// Builds the standard instrumentation stack over the base store
/// operation: history outermost, counting innermost.
pub fn instrument(
    name: impl Into<String>,
    cache: RandomKeyCache,
    store: Arc<dyn KeyValueStore>,
) -> CallHistory<CallCounted<CacheStoreOp>> {
    let base = CacheStoreOp::new(name, cache);
    let counted = CallCounted::new(base, store.clone());
    CallHistory::new(counted, store)
}

// == Call Count ==
/// Reads the recorded invocation count for an operation name. A missing
/// counter reads as zero.
pub fn call_count(store: &dyn KeyValueStore, name: &str) -> Result<u64> {
    match store.get(name)? {
        Some(raw) => Ok(std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0)),
        None => Ok(0),
    }
}
