use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Record, RecordStore, StoreResult};

/// A model persisted as one document of a fixed collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn set_id(&mut self, id: String);
}

/// Typed view of one collection of a [`RecordStore`].
pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// All documents of the collection. Bodies that no longer match the model
    /// are logged and skipped rather than failing the whole listing.
    pub async fn find_all(&self) -> StoreResult<Vec<T>> {
        let records = self.store.list(T::COLLECTION).await?;
        Ok(decode_all(records))
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(record) => Ok(Some(decode(record)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_field(&self, field: &str, value: impl Into<Value>) -> StoreResult<Vec<T>> {
        let records = self
            .store
            .get_by_field(T::COLLECTION, field, &value.into())
            .await?;
        Ok(decode_all(records))
    }

    pub async fn create(&self, document: T) -> StoreResult<T> {
        let record = self
            .store
            .create(T::COLLECTION, serde_json::to_value(&document)?)
            .await?;
        decode(record)
    }

    pub async fn update(&self, id: &str, document: &T) -> StoreResult<T> {
        let record = self
            .store
            .update(T::COLLECTION, id, serde_json::to_value(document)?)
            .await?;
        decode(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}

fn decode<T: Document>(record: Record) -> StoreResult<T> {
    let mut document: T = serde_json::from_value(record.data)?;
    document.set_id(record.id);
    Ok(document)
}

fn decode_all<T: Document>(records: Vec<Record>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match decode(record) {
                Ok(document) => Some(document),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} document {}: {}", T::COLLECTION, id, e);
                    None
                }
            }
        })
        .collect()
}
