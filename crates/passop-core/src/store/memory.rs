//! In-memory document store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::traits::{DeleteResult, Document, DocumentStore, InsertOneResult, APP_ID_FIELD, STORAGE_ID_FIELD};
use crate::error::Result;

/// Named collections of documents, shared by the in-memory and file backends
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Collections {
    collections: HashMap<String, Vec<Document>>,
}

impl Collections {
    /// Append a document and return its storage id
    pub(crate) fn insert(&mut self, collection: &str, mut document: Document) -> String {
        let storage_id = match document.get(STORAGE_ID_FIELD) {
            Some(Value::String(existing)) => existing.clone(),
            _ => {
                let fresh = Uuid::new_v4().simple().to_string();
                document.insert(STORAGE_ID_FIELD.to_string(), Value::String(fresh.clone()));
                fresh
            }
        };

        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);

        storage_id
    }

    pub(crate) fn all(&self, collection: &str) -> Vec<Document> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    /// Remove the first match; returns the removed document and its position
    pub(crate) fn remove(&mut self, collection: &str, key: &str) -> Option<(usize, Document)> {
        let documents = self.collections.get_mut(collection)?;

        let position = position_of(documents, STORAGE_ID_FIELD, key)
            .or_else(|| position_of(documents, APP_ID_FIELD, key))?;

        Some((position, documents.remove(position)))
    }

    /// Put a removed document back where it was
    pub(crate) fn restore(&mut self, collection: &str, position: usize, document: Document) {
        let documents = self.collections.entry(collection.to_string()).or_default();
        let position = position.min(documents.len());
        documents.insert(position, document);
    }

    /// Drop the most recently inserted document
    pub(crate) fn pop(&mut self, collection: &str) {
        if let Some(documents) = self.collections.get_mut(collection) {
            documents.pop();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

fn position_of(documents: &[Document], field: &str, key: &str) -> Option<usize> {
    documents
        .iter()
        .position(|doc| doc.get(field).and_then(Value::as_str) == Some(key))
}

/// Volatile document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult> {
        let inserted_id = self.collections.write().await.insert(collection, document);

        debug!("Inserted document {} into {}", inserted_id, collection);
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.collections.read().await.all(collection))
    }

    async fn delete_one(&self, collection: &str, key: &str) -> Result<DeleteResult> {
        let removed = self.collections.write().await.remove(collection, key);

        let deleted_count = u64::from(removed.is_some());
        debug!("Deleted {} document(s) from {} for key {}", deleted_count, collection, key);
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_storage_id() {
        let store = MemoryStore::new();

        let result = store
            .insert_one("passwords", doc(json!({"id": "a"})))
            .await
            .unwrap();

        assert!(result.acknowledged);
        assert_eq!(result.inserted_id.len(), 32);

        let all = store.find_all("passwords").await.unwrap();
        assert_eq!(all[0][STORAGE_ID_FIELD], json!(result.inserted_id));
    }

    #[tokio::test]
    async fn test_insert_keeps_existing_storage_id() {
        let store = MemoryStore::new();

        let result = store
            .insert_one("passwords", doc(json!({"_id": "fixed", "id": "a"})))
            .await
            .unwrap();

        assert_eq!(result.inserted_id, "fixed");
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let store = MemoryStore::new();

        for id in ["one", "two", "three"] {
            store.insert_one("passwords", doc(json!({"id": id}))).await.unwrap();
        }

        let ids: Vec<String> = store
            .find_all("passwords")
            .await
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.find_all("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_storage_id_and_app_id() {
        let store = MemoryStore::new();

        let first = store.insert_one("passwords", doc(json!({"id": "a"}))).await.unwrap();
        store.insert_one("passwords", doc(json!({"id": "b"}))).await.unwrap();

        let by_storage = store.delete_one("passwords", &first.inserted_id).await.unwrap();
        assert_eq!(by_storage.deleted_count, 1);

        let by_app = store.delete_one("passwords", "b").await.unwrap();
        assert_eq!(by_app.deleted_count, 1);

        assert!(store.find_all("passwords").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        store.insert_one("passwords", doc(json!({"id": "a"}))).await.unwrap();

        let result = store.delete_one("passwords", "zzz").await.unwrap();
        assert!(result.acknowledged);
        assert_eq!(result.deleted_count, 0);

        let result = store.delete_one("other", "a").await.unwrap();
        assert_eq!(result.deleted_count, 0);

        assert_eq!(store.find_all("passwords").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_only_one_duplicate() {
        let store = MemoryStore::new();
        store.insert_one("passwords", doc(json!({"id": "dup"}))).await.unwrap();
        store.insert_one("passwords", doc(json!({"id": "dup"}))).await.unwrap();

        store.delete_one("passwords", "dup").await.unwrap();
        assert_eq!(store.find_all("passwords").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = MemoryStore::new();
        store.insert_one("passwords", doc(json!({"id": "a"}))).await.unwrap();
        store.insert_one("generated_passwords", doc(json!({"id": "g"}))).await.unwrap();

        assert_eq!(store.find_all("passwords").await.unwrap().len(), 1);
        assert_eq!(store.find_all("generated_passwords").await.unwrap().len(), 1);
    }
}
