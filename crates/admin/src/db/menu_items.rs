//! Menu item repository.
//!
//! Menu items live in one flat collection and point at their restaurant
//! through `restaurantId`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use quickbite_core::{MenuItemId, RestaurantId};

use super::{Collection, Condition, Document, DocumentStore, StoreError, decode, decode_or_skip};
use crate::models::{MenuItem, MenuItemInput, lenient};

/// Emoji shown for menu items without one.
const DEFAULT_IMAGE: &str = "🍛";

/// A menu item document as stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuItemDoc {
    id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    restaurant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    available: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<MenuItemDoc> for MenuItem {
    fn from(doc: MenuItemDoc) -> Self {
        Self {
            id: MenuItemId::new(doc.id),
            restaurant_id: doc
                .restaurant_id
                .filter(|r| !r.is_empty())
                .map(RestaurantId::new),
            name: doc.name.unwrap_or_default(),
            category: doc.category.unwrap_or_default(),
            price: doc.price.unwrap_or_default(),
            description: doc.description.unwrap_or_default(),
            available: doc.available.unwrap_or(true),
            image: doc
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            image_url: doc.image_url.filter(|u| !u.is_empty()),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Repository for menu item documents.
pub struct MenuItemRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Menu items of one restaurant, sorted by category then name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, StoreError> {
        let docs = self
            .store
            .query(
                Collection::MenuItems,
                &[Condition::eq("restaurantId", restaurant_id.as_str())],
            )
            .await?;
        let mut items: Vec<MenuItem> = docs
            .into_iter()
            .filter_map(|doc| decode_or_skip::<MenuItemDoc>(Collection::MenuItems, doc))
            .map(MenuItem::from)
            .collect();
        items.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(items)
    }

    /// A menu item by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    /// Returns `StoreError::DataCorruption` if the document is undecodable.
    pub async fn get(&self, id: &MenuItemId) -> Result<Option<MenuItem>, StoreError> {
        let Some(doc) = self.store.get(Collection::MenuItems, id.as_str()).await? else {
            return Ok(None);
        };
        Ok(Some(decode::<MenuItemDoc>(doc)?.into()))
    }

    /// Create a menu item under a restaurant.
    ///
    /// The restaurant is not checked for existence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write or the read-back fails.
    pub async fn create(
        &self,
        restaurant_id: &RestaurantId,
        input: MenuItemInput,
    ) -> Result<MenuItem, StoreError> {
        let id = self
            .store
            .add(
                Collection::MenuItems,
                input.into_new_document(restaurant_id)?,
            )
            .await?;
        tracing::info!(menu_item_id = %id, %restaurant_id, "menu item created");
        self.get(&MenuItemId::new(id))
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
        id: &MenuItemId,
        input: MenuItemInput,
    ) -> Result<MenuItem, StoreError> {
        self.patch(id, input.into_patch()?).await
    }

    /// Remove a menu item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn delete(&self, id: &MenuItemId) -> Result<(), StoreError> {
        if self.store.delete(Collection::MenuItems, id.as_str()).await? {
            tracing::info!(menu_item_id = %id, "menu item deleted");
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    /// Flip `available` and return the updated item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item does not exist.
    pub async fn toggle_available(&self, id: &MenuItemId) -> Result<MenuItem, StoreError> {
        let current = self.get(id).await?.ok_or(StoreError::NotFound)?;
        let mut patch = Document::new();
        patch.insert("available".to_string(), Value::Bool(!current.available));
        self.patch(id, patch).await
    }

    async fn patch(&self, id: &MenuItemId, patch: Document) -> Result<MenuItem, StoreError> {
        self.store
            .update(Collection::MenuItems, id.as_str(), patch)
            .await?;
        self.get(id).await?.ok_or(StoreError::NotFound)
    }
}
