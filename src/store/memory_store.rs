use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{generate_id, Record, RecordStore, StoreError, StoreResult};

/// In-process record store. Used when no database is configured and in tests.
///
/// Records keep insertion order within a collection, matching the
/// `ORDER BY created_at` of the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        Ok(self
            .collections
            .get(collection)
            .map(|records| records.value().clone())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned()))
    }

    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Record>> {
        Ok(self
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.data.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, data: Value) -> StoreResult<Record> {
        let record = Record {
            id: generate_id(),
            data,
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Record> {
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let mut records = self.collections.get_mut(collection).ok_or_else(not_found)?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(not_found)?;
        record.data = data;
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let Some(mut records) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.create("tips", json!({"title": "a"})).await.unwrap();
        let b = store.create("tips", json!({"title": "b"})).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.list("tips").await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_get_by_field_matches_exact_value() {
        let store = MemoryStore::new();
        store.create("users", json!({"email": "a@x.io"})).await.unwrap();
        let bob = store.create("users", json!({"email": "b@x.io"})).await.unwrap();

        let found = store
            .get_by_field("users", "email", &json!("b@x.io"))
            .await
            .unwrap();
        assert_eq!(found, vec![bob]);

        let none = store
            .get_by_field("users", "email", &json!("c@x.io"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("reminders", "nope", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        let record = store.create("missed", json!({"title": "bin"})).await.unwrap();

        assert!(store.delete("missed", &record.id).await.unwrap());
        assert!(!store.delete("missed", &record.id).await.unwrap());
        assert!(store.get("missed", &record.id).await.unwrap().is_none());
    }
}
