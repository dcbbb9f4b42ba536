use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, FromRow, PgPool};

use super::{generate_id, Record, RecordStore, StoreError, StoreResult};

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl From<DocumentRow> for Record {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            data: row.data.0,
        }
    }
}

/// Record store backed by a single Postgres `documents` table with a JSONB body.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgDocumentStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Record::from))
    }

    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Record>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents
             WHERE collection = $1 AND data -> $2 = $3
             ORDER BY created_at",
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn create(&self, collection: &str, data: Value) -> StoreResult<Record> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO documents (collection, id, data)
             VALUES ($1, $2, $3)
             RETURNING id, data",
        )
        .bind(collection)
        .bind(generate_id())
        .bind(Json(data))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Record> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "UPDATE documents SET data = $3, updated_at = NOW()
             WHERE collection = $1 AND id = $2
             RETURNING id, data",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Record::from).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
