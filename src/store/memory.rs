//! In-Memory Store Module
//!
//! HashMap-backed implementation of the key-value store adapter with
//! string, list and hash slots plus lazy TTL expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{CacheError, Result};
use crate::store::{current_timestamp_ms, KeyValueStore};

// == Slot Data ==
/// The payload held in a single store slot.
#[derive(Debug, Clone)]
enum SlotData {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
    Hash(HashMap<String, Vec<u8>>),
}

impl SlotData {
    fn type_name(&self) -> &'static str {
        match self {
            SlotData::Bytes(_) => "string",
            SlotData::List(_) => "list",
            SlotData::Hash(_) => "hash",
        }
    }
}

// == Slot ==
/// A stored value with optional expiration.
#[derive(Debug, Clone)]
struct Slot {
    data: SlotData,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    expires_at: Option<u64>,
}

impl Slot {
    fn new(data: SlotData) -> Self {
        Self {
            data,
            expires_at: None,
        }
    }

    /// A slot is expired once the current time reaches its expiration time.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Memory Store ==
/// In-memory key-value store.
///
/// Stand-in for an external store process: self-synchronized, shared by
/// reference, and addressed only through the [`KeyValueStore`] trait.
/// Expired keys are dropped lazily on access rather than by a sweep.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the slot map. A poisoned lock still holds consistent data,
    /// so recover the guard instead of propagating the panic.
    fn locked(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Removes the slot if it has expired, returning whether it is live.
    fn prune_expired(slots: &mut HashMap<String, Slot>, key: &str) -> bool {
        match slots.get(key) {
            Some(slot) if slot.is_expired() => {
                slots.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    fn wrong_type(key: &str, found: &SlotData) -> CacheError {
        CacheError::Store(format!(
            "wrong slot type for key '{}': found {}",
            key,
            found.type_name()
        ))
    }
}

impl KeyValueStore for MemoryStore {
    // == Set ==
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut slots = self.locked();
        slots.insert(key.to_string(), Slot::new(SlotData::Bytes(value.to_vec())));
        Ok(())
    }

    // == Get ==
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut slots = self.locked();
        if !Self::prune_expired(&mut slots, key) {
            return Ok(None);
        }
        match &slots[key].data {
            SlotData::Bytes(bytes) => Ok(Some(bytes.clone())),
            other => Err(Self::wrong_type(key, other)),
        }
    }

    // == Incr ==
    fn incr(&self, key: &str) -> Result<i64> {
        let mut slots = self.locked();
        Self::prune_expired(&mut slots, key);
        let current = match slots.get(key) {
            Some(slot) => match &slot.data {
                SlotData::Bytes(bytes) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| {
                        CacheError::Store(format!("value at '{}' is not an integer", key))
                    })?,
                other => return Err(Self::wrong_type(key, other)),
            },
            None => 0,
        };
        let next = current + 1;
        slots.insert(
            key.to_string(),
            Slot::new(SlotData::Bytes(next.to_string().into_bytes())),
        );
        Ok(next)
    }

    // == Rpush ==
    fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut slots = self.locked();
        Self::prune_expired(&mut slots, key);
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::new(SlotData::List(Vec::new())));
        match &mut slot.data {
            SlotData::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            other => Err(Self::wrong_type(key, other)),
        }
    }

    // == Lrange ==
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let mut slots = self.locked();
        if !Self::prune_expired(&mut slots, key) {
            return Ok(Vec::new());
        }
        match &slots[key].data {
            SlotData::List(items) => {
                let len = items.len() as i64;
                // Negative indices count back from the end of the list
                let resolve = |idx: i64| -> i64 {
                    if idx < 0 {
                        (len + idx).max(0)
                    } else {
                        idx
                    }
                };
                let from = resolve(start);
                let to = resolve(stop).min(len - 1);
                if from > to || len == 0 {
                    return Ok(Vec::new());
                }
                Ok(items[from as usize..=to as usize].to_vec())
            }
            other => Err(Self::wrong_type(key, other)),
        }
    }

    // == Hset ==
    fn hset(&self, key: &str, field: &str, value: &[u8]) -> Result<()> {
        let mut slots = self.locked();
        Self::prune_expired(&mut slots, key);
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::new(SlotData::Hash(HashMap::new())));
        match &mut slot.data {
            SlotData::Hash(fields) => {
                fields.insert(field.to_string(), value.to_vec());
                Ok(())
            }
            other => Err(Self::wrong_type(key, other)),
        }
    }

    // == Hget ==
    fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut slots = self.locked();
        if !Self::prune_expired(&mut slots, key) {
            return Ok(None);
        }
        match &slots[key].data {
            SlotData::Hash(fields) => Ok(fields.get(field).cloned()),
            other => Err(Self::wrong_type(key, other)),
        }
    }

    // == Hincrby ==
    fn hincrby(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        let mut slots = self.locked();
        Self::prune_expired(&mut slots, key);
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::new(SlotData::Hash(HashMap::new())));
        match &mut slot.data {
            SlotData::Hash(fields) => {
                let current = match fields.get(field) {
                    Some(bytes) => std::str::from_utf8(bytes)
                        .ok()
                        .and_then(|s| s.parse::<i64>().ok())
                        .ok_or_else(|| {
                            CacheError::Store(format!(
                                "hash field '{}' of '{}' is not an integer",
                                field, key
                            ))
                        })?,
                    None => 0,
                };
                let next = current + delta;
                fields.insert(field.to_string(), next.to_string().into_bytes());
                Ok(next)
            }
            other => Err(Self::wrong_type(key, other)),
        }
    }

    // == Expire ==
    fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()> {
        let mut slots = self.locked();
        if !Self::prune_expired(&mut slots, key) {
            return Ok(());
        }
        if let Some(slot) = slots.get_mut(key) {
            slot.expires_at = Some(current_timestamp_ms() + ttl_seconds * 1000);
        }
        Ok(())
    }

    // == Exists ==
    fn exists(&self, key: &str) -> Result<bool> {
        let mut slots = self.locked();
        Ok(Self::prune_expired(&mut slots, key))
    }

    // == Flush ==
    fn flushdb(&self) -> Result<()> {
        self.locked().clear();
        Ok(())
    }

    // == Size ==
    fn dbsize(&self) -> Result<usize> {
        let mut slots = self.locked();
        let expired: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            slots.remove(&key);
        }
        Ok(slots.len())
    }
}
