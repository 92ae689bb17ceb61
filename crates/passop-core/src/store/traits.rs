//! Document store trait definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A schemaless stored document
pub type Document = Map<String, Value>;

/// Field holding the storage-assigned identifier
pub const STORAGE_ID_FIELD: &str = "_id";

/// Field holding the caller-assigned identifier
pub const APP_ID_FIELD: &str = "id";

/// Outcome of a single-document insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Outcome of a single-document delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Trait for document persistence backends
///
/// Every call is atomic for the single document it touches; nothing
/// spans documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, assigning `_id` when absent
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult>;

    /// All documents of a collection in insertion order
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Delete the first document whose `_id`, or failing that `id`, equals `key`
    async fn delete_one(&self, collection: &str, key: &str) -> Result<DeleteResult>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
