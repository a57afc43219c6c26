//! Document storage for the admin dashboard.
//!
//! Records are schemaless JSON documents addressed by `(collection, id)`.
//! Two interchangeable backends implement the same semantics:
//!
//! - [`PgDocumentStore`] - `admin.documents` table with a JSONB `data` column
//! - [`MemoryDocumentStore`] - process-local map used by tests and demo mode
//!
//! Typed repositories ([`RestaurantRepository`], [`OrderRepository`], ...)
//! sit on top of [`DocumentStore`] and convert documents into models.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p quickbite-cli -- migrate
//! ```

pub mod grocery_items;
pub mod memory;
pub mod menu_items;
pub mod orders;
pub mod postgres;
pub mod query;
pub mod restaurants;
pub mod seed;
pub mod settings;

use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use grocery_items::GroceryItemRepository;
pub use memory::MemoryDocumentStore;
pub use menu_items::MenuItemRepository;
pub use orders::{OrderRepository, StatusUpdateError};
pub use postgres::PgDocumentStore;
pub use query::{Condition, Operator};
pub use restaurants::RestaurantRepository;
pub use settings::{SettingsError, SettingsRepository};

/// A stored JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,
}

/// Named document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Restaurants,
    MenuItems,
    GroceryItems,
    Orders,
    AppSettings,
}

impl Collection {
    /// Every collection, in display order.
    pub const ALL: [Self; 5] = [
        Self::Restaurants,
        Self::MenuItems,
        Self::GroceryItems,
        Self::Orders,
        Self::AppSettings,
    ];

    /// Collection name as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurants => "restaurants",
            Self::MenuItems => "menuItems",
            Self::GroceryItems => "groceryItems",
            Self::Orders => "orders",
            Self::AppSettings => "appSettings",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store over either backend.
///
/// Every document returned carries its key in an `id` field, overriding any
/// `id` stored in the data.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    Postgres(PgDocumentStore),
    Memory(MemoryDocumentStore),
}

impl DocumentStore {
    /// Store backed by a `PostgreSQL` pool.
    #[must_use]
    pub const fn postgres(pool: PgPool) -> Self {
        Self::Postgres(PgDocumentStore::new(pool))
    }

    /// Empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryDocumentStore::default())
    }

    /// Check the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database cannot be queried.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Every document in a collection, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        tracing::debug!(%collection, "list documents");
        match self {
            Self::Postgres(store) => store.list(collection).await,
            Self::Memory(store) => Ok(store.list(collection).await),
        }
    }

    /// A single document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        tracing::debug!(%collection, id, "get document");
        match self {
            Self::Postgres(store) => store.get(collection, id).await,
            Self::Memory(store) => Ok(store.get(collection, id).await),
        }
    }

    /// Insert a document under a fresh id, stamping `createdAt` and
    /// `updatedAt`. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the insert fails.
    pub async fn add(&self, collection: Collection, data: Document) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.insert(collection, &id, data).await?;
        Ok(id)
    }

    /// Insert a document under a caller-chosen id, stamping `createdAt` and
    /// `updatedAt` unless the data already carries them. An existing document
    /// with the same id is replaced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the insert fails.
    pub async fn insert(
        &self,
        collection: Collection,
        id: &str,
        mut data: Document,
    ) -> Result<(), StoreError> {
        tracing::debug!(%collection, id, "insert document");
        data.remove("id");
        let now = Value::String(Utc::now().to_rfc3339());
        data.entry("createdAt").or_insert_with(|| now.clone());
        data.entry("updatedAt").or_insert(now);
        match self {
            Self::Postgres(store) => store.insert(collection, id, &data).await,
            Self::Memory(store) => {
                store.insert(collection, id, data).await;
                Ok(())
            }
        }
    }

    /// Shallow-merge `patch` into an existing document and stamp `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    pub async fn update(
        &self,
        collection: Collection,
        id: &str,
        mut patch: Document,
    ) -> Result<(), StoreError> {
        tracing::debug!(%collection, id, "update document");
        patch.remove("id");
        patch.insert(
            "updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        let updated = match self {
            Self::Postgres(store) => store.update(collection, id, &patch).await?,
            Self::Memory(store) => store.update(collection, id, patch).await,
        };
        if updated { Ok(()) } else { Err(StoreError::NotFound) }
    }

    /// Create or shallow-merge a document under a known id, stamping
    /// `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the upsert fails.
    pub async fn set_merge(
        &self,
        collection: Collection,
        id: &str,
        mut data: Document,
    ) -> Result<(), StoreError> {
        tracing::debug!(%collection, id, "merge document");
        data.remove("id");
        data.insert(
            "updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        match self {
            Self::Postgres(store) => store.set_merge(collection, id, &data).await,
            Self::Memory(store) => {
                store.set_merge(collection, id, data).await;
                Ok(())
            }
        }
    }

    /// Remove a document. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the delete fails.
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        tracing::debug!(%collection, id, "delete document");
        match self {
            Self::Postgres(store) => store.delete(collection, id).await,
            Self::Memory(store) => Ok(store.delete(collection, id).await),
        }
    }

    /// Documents matching every condition, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn query(
        &self,
        collection: Collection,
        conditions: &[Condition],
    ) -> Result<Vec<Document>, StoreError> {
        tracing::debug!(%collection, conditions = conditions.len(), "query documents");
        match self {
            Self::Postgres(store) => store.query(collection, conditions).await,
            Self::Memory(store) => Ok(store.query(collection, conditions).await),
        }
    }

    /// Number of documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn count(&self, collection: Collection) -> Result<usize, StoreError> {
        match self {
            Self::Postgres(store) => store.count(collection).await,
            Self::Memory(store) => Ok(store.count(collection).await),
        }
    }
}

/// Attach the document key as `id`.
pub(crate) fn with_id(id: &str, mut data: Document) -> Document {
    data.insert("id".to_string(), Value::String(id.to_string()));
    data
}

/// Serialize a value into a document.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if the value is not a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Deserialize a document, logging and skipping it on failure.
pub(crate) fn decode_or_skip<T: DeserializeOwned>(
    collection: Collection,
    doc: Document,
) -> Option<T> {
    let id = doc
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    match serde_json::from_value(Value::Object(doc)) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%collection, id, error = %e, "skipping undecodable document");
            None
        }
    }
}

/// Deserialize a single document that the caller asked for by id.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if the document cannot be decoded.
pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| StoreError::DataCorruption(format!("undecodable document: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::MenuItems.as_str(), "menuItems");
        assert_eq!("appSettings".parse::<Collection>(), Ok(Collection::AppSettings));
        assert!("users".parse::<Collection>().is_err());
    }

    #[tokio::test]
    async fn test_add_stamps_timestamps_and_injects_id() {
        let store = DocumentStore::memory();
        let id = store
            .add(Collection::Restaurants, doc(json!({"name": "Dosa Hut", "id": "bogus"})))
            .await
            .unwrap();

        let stored = store.get(Collection::Restaurants, &id).await.unwrap().unwrap();
        assert_eq!(stored["id"], json!(id));
        assert_eq!(stored["name"], json!("Dosa Hut"));
        assert!(stored.contains_key("createdAt"));
        assert_eq!(stored["createdAt"], stored["updatedAt"]);
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_timestamps() {
        let store = DocumentStore::memory();
        store
            .insert(
                Collection::Orders,
                "o1",
                doc(json!({"createdAt": "2026-01-15T10:00:00Z"})),
            )
            .await
            .unwrap();

        let stored = store.get(Collection::Orders, "o1").await.unwrap().unwrap();
        assert_eq!(stored["createdAt"], json!("2026-01-15T10:00:00Z"));
        assert_ne!(stored["updatedAt"], stored["createdAt"]);
    }

    #[tokio::test]
    async fn test_update_merges_and_reports_missing() {
        let store = DocumentStore::memory();
        let id = store
            .add(Collection::MenuItems, doc(json!({"name": "Idli", "price": 40})))
            .await
            .unwrap();

        store
            .update(Collection::MenuItems, &id, doc(json!({"price": 45})))
            .await
            .unwrap();
        let stored = store.get(Collection::MenuItems, &id).await.unwrap().unwrap();
        assert_eq!(stored["name"], json!("Idli"));
        assert_eq!(stored["price"], json!(45));

        let missing = store
            .update(Collection::MenuItems, "nope", doc(json!({"price": 1})))
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_set_merge_creates_then_merges() {
        let store = DocumentStore::memory();
        store
            .set_merge(Collection::AppSettings, "customerSupport", doc(json!({"phone": "1"})))
            .await
            .unwrap();
        store
            .set_merge(Collection::AppSettings, "customerSupport", doc(json!({"email": "a@b.c"})))
            .await
            .unwrap();

        let stored = store
            .get(Collection::AppSettings, "customerSupport")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["phone"], json!("1"));
        assert_eq!(stored["email"], json!("a@b.c"));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = DocumentStore::memory();
        let id = store
            .add(Collection::Orders, doc(json!({"status": "pending"})))
            .await
            .unwrap();
        assert!(store.delete(Collection::Orders, &id).await.unwrap());
        assert!(!store.delete(Collection::Orders, &id).await.unwrap());
        assert_eq!(store.count(Collection::Orders).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_filters_within_collection() {
        let store = DocumentStore::memory();
        store
            .add(Collection::Orders, doc(json!({"orderType": "food"})))
            .await
            .unwrap();
        store
            .add(Collection::Orders, doc(json!({"orderType": "grocery"})))
            .await
            .unwrap();
        store
            .add(Collection::GroceryItems, doc(json!({"orderType": "food"})))
            .await
            .unwrap();

        let food = store
            .query(Collection::Orders, &[Condition::eq("orderType", "food")])
            .await
            .unwrap();
        assert_eq!(food.len(), 1);
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        assert!(to_document(&json!({"a": 1})).is_ok());
        assert!(matches!(
            to_document(&json!([1, 2])),
            Err(StoreError::DataCorruption(_))
        ));
    }
}
