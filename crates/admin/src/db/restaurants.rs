//! Restaurant repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use quickbite_core::RestaurantId;

use super::{Collection, Document, DocumentStore, StoreError, decode, decode_or_skip};
use crate::models::lenient;
use crate::models::restaurant::{DEFAULT_IMAGE, DEFAULT_RATING, DEFAULT_STATUS};
use crate::models::{Restaurant, RestaurantInput};

// =============================================================================
// Internal Document Types
// =============================================================================

/// A restaurant document as stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestaurantDoc {
    id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    owner_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    contact: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    owner_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    cuisine: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    delivery_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    rating: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    logo: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<RestaurantDoc> for Restaurant {
    fn from(doc: RestaurantDoc) -> Self {
        Self {
            id: RestaurantId::new(doc.id),
            name: doc.name.unwrap_or_default(),
            address: doc.address.unwrap_or_default(),
            owner_email: doc.owner_email.unwrap_or_default(),
            contact: doc.contact.unwrap_or_default(),
            owner_phone: doc.owner_phone.unwrap_or_default(),
            cuisine: doc.cuisine.unwrap_or_default(),
            delivery_time: doc.delivery_time.unwrap_or_default(),
            rating: doc.rating.unwrap_or(DEFAULT_RATING),
            image: doc
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            logo: doc.logo.filter(|l| !l.is_empty()),
            status: doc.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            is_active: doc.is_active.unwrap_or(true),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for restaurant documents.
pub struct RestaurantRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> RestaurantRepository<'a> {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// All restaurants, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Restaurant>, StoreError> {
        let docs = self.store.list(Collection::Restaurants).await?;
        let mut restaurants: Vec<Restaurant> = docs
            .into_iter()
            .filter_map(|doc| decode_or_skip::<RestaurantDoc>(Collection::Restaurants, doc))
            .map(Restaurant::from)
            .collect();
        restaurants.sort_by_key(|r| r.name.to_lowercase());
        Ok(restaurants)
    }

    /// A restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    /// Returns `StoreError::DataCorruption` if the document is undecodable.
    pub async fn get(&self, id: &RestaurantId) -> Result<Option<Restaurant>, StoreError> {
        let Some(doc) = self.store.get(Collection::Restaurants, id.as_str()).await? else {
            return Ok(None);
        };
        Ok(Some(decode::<RestaurantDoc>(doc)?.into()))
    }

    /// Create a restaurant and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write or the read-back fails.
    pub async fn create(&self, input: RestaurantInput) -> Result<Restaurant, StoreError> {
        let id = self
            .store
            .add(Collection::Restaurants, input.into_new_document()?)
            .await?;
        tracing::info!(restaurant_id = %id, "restaurant created");
        self.get(&RestaurantId::new(id))
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Apply the supplied fields and return the updated restaurant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the restaurant does not exist.
    pub async fn update(
        &self,
        id: &RestaurantId,
        input: RestaurantInput,
    ) -> Result<Restaurant, StoreError> {
        self.patch(id, input.into_patch()?).await
    }

    /// Delete a restaurant. Its menu items and orders are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the restaurant does not exist.
    pub async fn delete(&self, id: &RestaurantId) -> Result<(), StoreError> {
        if self.store.delete(Collection::Restaurants, id.as_str()).await? {
            tracing::info!(restaurant_id = %id, "restaurant deleted");
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    /// Flip `isActive` and return the updated restaurant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the restaurant does not exist.
    pub async fn toggle_active(&self, id: &RestaurantId) -> Result<Restaurant, StoreError> {
        let current = self.get(id).await?.ok_or(StoreError::NotFound)?;
        let mut patch = Document::new();
        patch.insert("isActive".to_string(), Value::Bool(!current.is_active));
        self.patch(id, patch).await
    }

    async fn patch(&self, id: &RestaurantId, patch: Document) -> Result<Restaurant, StoreError> {
        self.store
            .update(Collection::Restaurants, id.as_str(), patch)
            .await?;
        self.get(id).await?.ok_or(StoreError::NotFound)
    }
}
