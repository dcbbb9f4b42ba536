pub mod memory_store;
pub mod pg_store;
pub mod repository;

pub use memory_store::MemoryStore;
pub use pg_store::PgDocumentStore;
pub use repository::{Document, Repository};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A persisted document: its generated id plus the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub data: Value,
}

/// Document database keyed by `(collection, id)`.
///
/// Every call is a single round trip and reports failures through
/// [`StoreError`]; callers decide whether a failure aborts their work.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: &str) -> StoreResult<Vec<Record>>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>>;

    /// Records whose top-level `field` equals `value`.
    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Record>>;

    /// Inserts `data` under a freshly generated id.
    async fn create(&self, collection: &str, data: Value) -> StoreResult<Record>;

    /// Replaces the body of an existing record; `NotFound` if it is absent.
    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Record>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
