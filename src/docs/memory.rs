//! In-Memory Document Collection
//!
//! Test double for the document store adapter. Supports equality and
//! array-containment filters and `$set` updates; aggregation pipelines
//! are out of scope and reported as unsupported.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value as Document;
use uuid::Uuid;

use crate::docs::DocumentStore;
use crate::error::{CacheError, Result};

// == Memory Collection ==
#[derive(Debug, Default)]
pub struct MemoryCollection {
    docs: Mutex<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, Vec<Document>> {
        self.docs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A document matches when every filter field equals the document
    /// field, or the document field is an array containing the filter
    /// value (how `{"topics": "Math"}` matches a topics array).
    fn matches(doc: &Document, filter: &Document) -> bool {
        let Some(fields) = filter.as_object() else {
            return false;
        };
        fields.iter().all(|(key, expected)| match doc.get(key) {
            Some(actual) if actual == expected => true,
            Some(Document::Array(items)) => items.contains(expected),
            _ => false,
        })
    }
}

impl DocumentStore for MemoryCollection {
    fn find(&self, filter: &Document) -> Result<Vec<Document>> {
        Ok(self
            .locked()
            .iter()
            .filter(|doc| Self::matches(doc, filter))
            .cloned()
            .collect())
    }

    fn insert_one(&self, mut doc: Document) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        match doc.as_object_mut() {
            Some(fields) => {
                fields.insert("_id".to_string(), Document::String(id.clone()));
            }
            None => {
                return Err(CacheError::InvalidRequest(
                    "document must be a JSON object".to_string(),
                ))
            }
        }
        self.locked().push(doc);
        Ok(id)
    }

    fn update_many(&self, filter: &Document, update: &Document) -> Result<u64> {
        let set_fields = update
            .get("$set")
            .and_then(|v| v.as_object())
            .ok_or_else(|| {
                CacheError::Unsupported("only $set updates are supported".to_string())
            })?;

        let mut modified = 0;
        for doc in self.locked().iter_mut() {
            if !Self::matches(doc, filter) {
                continue;
            }
            if let Some(fields) = doc.as_object_mut() {
                for (key, value) in set_fields {
                    fields.insert(key.clone(), value.clone());
                }
                modified += 1;
            }
        }
        Ok(modified)
    }

    fn aggregate(&self, _pipeline: &[Document]) -> Result<Vec<Document>> {
        Err(CacheError::Unsupported(
            "aggregation pipelines require the external engine".to_string(),
        ))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_everything() {
        let collection = MemoryCollection::new();
        collection.insert_one(json!({ "a": 1 })).unwrap();
        collection.insert_one(json!({ "b": 2 })).unwrap();

        assert_eq!(collection.find(&json!({})).unwrap().len(), 2);
    }

    #[test]
    fn test_equality_filter() {
        let collection = MemoryCollection::new();
        collection.insert_one(json!({ "name": "A" })).unwrap();
        collection.insert_one(json!({ "name": "B" })).unwrap();

        let found = collection.find(&json!({ "name": "A" })).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("A"));
    }

    #[test]
    fn test_array_containment_filter() {
        let collection = MemoryCollection::new();
        collection
            .insert_one(json!({ "name": "A", "topics": ["Math", "Bio"] }))
            .unwrap();

        assert_eq!(collection.find(&json!({ "topics": "Bio" })).unwrap().len(), 1);
        assert!(collection.find(&json!({ "topics": "Chem" })).unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let collection = MemoryCollection::new();
        let a = collection.insert_one(json!({ "n": 1 })).unwrap();
        let b = collection.insert_one(json!({ "n": 2 })).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_insert_rejects_non_object() {
        let collection = MemoryCollection::new();
        assert!(matches!(
            collection.insert_one(json!([1, 2, 3])),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_update_many_rejects_non_set_updates() {
        let collection = MemoryCollection::new();
        assert!(matches!(
            collection.update_many(&json!({}), &json!({ "$inc": { "n": 1 } })),
            Err(CacheError::Unsupported(_))
        ));
    }
}
