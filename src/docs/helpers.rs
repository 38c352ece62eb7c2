//! Document Helper Functions
//!
//! Thin wrappers over the document store adapter for the school and
//! student collections.

use serde_json::{json, Value as Document};

use crate::docs::DocumentStore;
use crate::error::Result;

/// Lists all documents in the collection. Returns an empty list for an
/// empty collection.
pub fn list_all(collection: &dyn DocumentStore) -> Result<Vec<Document>> {
    collection.find(&json!({}))
}

/// Inserts a new school document and returns its generated id.
pub fn insert_school(collection: &dyn DocumentStore, doc: Document) -> Result<String> {
    collection.insert_one(doc)
}

/// Replaces the topics of every school matching `name`, returning the
/// number of documents updated.
pub fn update_topics(
    collection: &dyn DocumentStore,
    name: &str,
    topics: &[String],
) -> Result<u64> {
    collection.update_many(&json!({ "name": name }), &json!({ "$set": { "topics": topics } }))
}

/// Returns the schools covering a specific topic.
pub fn schools_by_topic(collection: &dyn DocumentStore, topic: &str) -> Result<Vec<Document>> {
    collection.find(&json!({ "topics": topic }))
}

/// Returns all students sorted by average score, descending.
pub fn top_students(collection: &dyn DocumentStore) -> Result<Vec<Document>> {
    collection.aggregate(&[
        json!({ "$unwind": "$topics" }),
        json!({ "$group": {
            "_id": "$_id",
            "name": { "$first": "$name" },
            "averageScore": { "$avg": "$topics.score" },
        }}),
        json!({ "$project": { "_id": 1, "name": 1, "averageScore": 1 } }),
        json!({ "$sort": { "averageScore": -1 } }),
    ])
}
