//! `PostgreSQL` document backend.
//!
//! Documents live in `admin.documents`:
//!
//! ```sql
//! collection TEXT, id TEXT, data JSONB, created_at, updated_at
//! PRIMARY KEY (collection, id)
//! ```
//!
//! Shallow merges use the JSONB `||` operator. Scalar equality conditions are
//! pushed down as a `data @> $2` containment filter (GIN indexed); every
//! condition is then re-checked in Rust so both backends agree exactly.

use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use super::query::{containment_filter, matches_all};
use super::{Collection, Condition, Document, StoreError, with_id};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Value,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, StoreError> {
        match self.data {
            Value::Object(map) => Ok(with_id(&self.id, map)),
            other => Err(StoreError::DataCorruption(format!(
                "document {} is not a JSON object: {other}",
                self.id
            ))),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Document store over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(super) async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub(super) async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data FROM admin.documents
            WHERE collection = $1
            ORDER BY id
            ",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    pub(super) async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data FROM admin.documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DocumentRow::into_document).transpose()
    }

    pub(super) async fn insert(
        &self,
        collection: Collection,
        id: &str,
        data: &Document,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO admin.documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, created_at = NOW(), updated_at = NOW()
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(super) async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: &Document,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE admin.documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn set_merge(
        &self,
        collection: Collection,
        id: &str,
        data: &Document,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO admin.documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = admin.documents.data || EXCLUDED.data, updated_at = NOW()
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(super) async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            DELETE FROM admin.documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn query(
        &self,
        collection: Collection,
        conditions: &[Condition],
    ) -> Result<Vec<Document>, StoreError> {
        let Some(filter) = containment_filter(conditions) else {
            let docs = self.list(collection).await?;
            return Ok(docs
                .into_iter()
                .filter(|doc| matches_all(doc, conditions))
                .collect());
        };

        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data FROM admin.documents
            WHERE collection = $1 AND data @> $2
            ORDER BY id
            ",
        )
        .bind(collection.as_str())
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await?;

        let docs = rows
            .into_iter()
            .map(DocumentRow::into_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs
            .into_iter()
            .filter(|doc| matches_all(doc, conditions))
            .collect())
    }

    pub(super) async fn count(&self, collection: Collection) -> Result<usize, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admin.documents WHERE collection = $1")
                .bind(collection.as_str())
                .fetch_one(&self.pool)
                .await?;

        usize::try_from(count)
            .map_err(|e| StoreError::DataCorruption(format!("invalid document count: {e}")))
    }
}
