//! Document Store Module
//!
//! Adapter trait for an external document database plus thin helper
//! functions over it. The query/update engine itself is a black box;
//! filters, updates and pipelines are opaque structured queries.

mod helpers;
mod memory;

pub use helpers::{insert_school, list_all, schools_by_topic, top_students, update_topics};
pub use memory::MemoryCollection;

use serde_json::Value as Document;

use crate::error::Result;

// == Document Store Trait ==
/// Thin adapter over a document collection.
pub trait DocumentStore: Send + Sync {
    /// Returns every document matching the filter, in insertion order.
    fn find(&self, filter: &Document) -> Result<Vec<Document>>;

    /// Inserts one document and returns its generated id.
    fn insert_one(&self, doc: Document) -> Result<String>;

    /// Applies the update to every matching document, returning the
    /// number of documents modified.
    fn update_many(&self, filter: &Document, update: &Document) -> Result<u64>;

    /// Runs an aggregation pipeline.
    fn aggregate(&self, pipeline: &[Document]) -> Result<Vec<Document>>;
}
