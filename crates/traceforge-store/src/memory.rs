//! In-memory store implementation

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use traceforge_utils::error::StoreError;

use crate::{Collection, Store};

/// Mutex-guarded in-memory store with stable insertion order per collection.
///
/// Suitable for embedding, demos, and tests. Cloning the handle is the
/// caller's job (wrap in `Arc` to share across tasks).
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<(String, Value)>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        Ok(collections.get(&collection).and_then(|records| {
            records
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }))
    }

    fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let records = collections.entry(collection).or_default();
        match records.iter_mut().find(|(k, _)| k == key) {
            // Replace in place so insertion order survives updates
            Some((_, existing)) => *existing = record,
            None => records.push((key.to_string(), record)),
        }
        Ok(())
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(records) = collections.get_mut(&collection) {
            records.retain(|(k, _)| k != key);
        }
        Ok(())
    }

    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        Ok(collections
            .get(&collection)
            .map(|records| records.iter().map(|(_, v)| v.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        store
            .put(Collection::Requirements, "REQ-002", json!({"id": "REQ-002"}))
            .unwrap();
        store
            .put(Collection::Requirements, "REQ-001", json!({"id": "REQ-001"}))
            .unwrap();
        store
            .put(Collection::Requirements, "REQ-003", json!({"id": "REQ-003"}))
            .unwrap();

        let ids: Vec<String> = store
            .list(Collection::Requirements)
            .unwrap()
            .into_iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["REQ-002", "REQ-001", "REQ-003"]);
    }

    #[test]
    fn test_put_replaces_in_place() {
        let store = MemoryStore::new();
        store
            .put(Collection::TestCases, "TC-1", json!({"rev": 1}))
            .unwrap();
        store
            .put(Collection::TestCases, "TC-2", json!({"rev": 1}))
            .unwrap();
        store
            .put(Collection::TestCases, "TC-1", json!({"rev": 2}))
            .unwrap();

        let records = store.list(Collection::TestCases).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["rev"], 2, "updated record kept its position");
    }

    #[test]
    fn test_get_absent_and_delete_absent() {
        let store = MemoryStore::new();
        assert!(store.get(Collection::Sessions, "nope").unwrap().is_none());
        store.delete(Collection::Sessions, "nope").unwrap();
    }

    #[test]
    fn test_collections_are_isolated() {
        let store = MemoryStore::new();
        store
            .put(Collection::Requirements, "REQ-001", json!({"id": "REQ-001"}))
            .unwrap();
        assert!(store.list(Collection::TestCases).unwrap().is_empty());
        assert!(
            store
                .get(Collection::TestCases, "REQ-001")
                .unwrap()
                .is_none()
        );
    }
}
