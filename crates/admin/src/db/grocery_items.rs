//! Grocery item repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use quickbite_core::GroceryItemId;

use super::{
    Collection, Condition, Document, DocumentStore, Operator, StoreError, decode, decode_or_skip,
};
use crate::models::{GroceryItem, GroceryItemInput, lenient};

/// Emoji shown for grocery items without one.
const DEFAULT_UNICODE: &str = "🛒";

/// A grocery item document as stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroceryItemDoc {
    id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::integer")]
    stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    unicode: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<GroceryItemDoc> for GroceryItem {
    fn from(doc: GroceryItemDoc) -> Self {
        Self {
            id: GroceryItemId::new(doc.id),
            name: doc.name.unwrap_or_default(),
            category: doc.category.unwrap_or_else(|| "Other".to_string()),
            price: doc.price.unwrap_or_default(),
            stock: doc.stock.unwrap_or_default(),
            description: doc.description.unwrap_or_default(),
            is_active: doc.is_active.unwrap_or(true),
            image: doc.image.filter(|i| !i.is_empty()),
            unicode: doc
                .unicode
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_UNICODE.to_string()),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Repository for grocery item documents.
pub struct GroceryItemRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> GroceryItemRepository<'a> {
    /// Create a new grocery item repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Grocery items sorted by category then name.
    ///
    /// With `active_only`, soft-deleted items are left out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list(&self, active_only: bool) -> Result<Vec<GroceryItem>, StoreError> {
        let docs = if active_only {
            self.store
                .query(
                    Collection::GroceryItems,
                    &[Condition::new("isActive", Operator::Ne, false)],
                )
                .await?
        } else {
            self.store.list(Collection::GroceryItems).await?
        };
        let mut items: Vec<GroceryItem> = docs
            .into_iter()
            .filter_map(|doc| decode_or_skip::<GroceryItemDoc>(Collection::GroceryItems, doc))
            .map(GroceryItem::from)
            .filter(|item| !active_only || item.is_active)
            .collect();
        items.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(items)
    }

    /// A grocery item by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    /// Returns `StoreError::DataCorruption` if the document is undecodable.
    pub async fn get(&self, id: &GroceryItemId) -> Result<Option<GroceryItem>, StoreError> {
        let Some(doc) = self.store.get(Collection::GroceryItems, id.as_str()).await? else {
            return Ok(None);
        };
        Ok(Some(decode::<GroceryItemDoc>(doc)?.into()))
    }

    /// Create a grocery item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write or the read-back fails.
    pub async fn create(&self, input: GroceryItemInput) -> Result<GroceryItem, StoreError> {
        let id = self
            .store
            .add(Collection::GroceryItems, input.into_new_document()?)
            .await?;
        tracing::info!(grocery_item_id = %id, "grocery item created");
        self.get(&GroceryItemId::new(id))
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Apply the supplied fields and return the updated item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn update(
        &self,
        id: &GroceryItemId,
        input: GroceryItemInput,
    ) -> Result<GroceryItem, StoreError> {
        self.patch(id, input.into_patch()?).await
    }

    /// Hide an item from customers by clearing `isActive`. The document is
    /// kept so past orders still resolve.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn soft_delete(&self, id: &GroceryItemId) -> Result<GroceryItem, StoreError> {
        tracing::info!(grocery_item_id = %id, "grocery item deactivated");
        self.set_active(id, false).await
    }

    /// Flip `isActive` and return the updated item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn toggle_active(&self, id: &GroceryItemId) -> Result<GroceryItem, StoreError> {
        let current = self.get(id).await?.ok_or(StoreError::NotFound)?;
        self.set_active(id, !current.is_active).await
    }

    async fn set_active(&self, id: &GroceryItemId, active: bool) -> Result<GroceryItem, StoreError> {
        let mut patch = Document::new();
        patch.insert("isActive".to_string(), Value::Bool(active));
        self.patch(id, patch).await
    }

    async fn patch(&self, id: &GroceryItemId, patch: Document) -> Result<GroceryItem, StoreError> {
        self.store
            .update(Collection::GroceryItems, id.as_str(), patch)
            .await?;
        self.get(id).await?.ok_or(StoreError::NotFound)
    }
}
