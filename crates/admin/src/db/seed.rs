//! Bulk loading of demo and fixture data.
//!
//! Seed records carry their own ids, so running the same seed twice replaces
//! documents instead of duplicating them. Orders are stored as given; their
//! `createdAt`/`updatedAt` values are kept.

use serde::Deserialize;
use thiserror::Error;

use quickbite_core::{GroceryItemId, MenuItemId, OrderId, RestaurantId};

use super::{Collection, Document, DocumentStore, SettingsError, SettingsRepository, StoreError};
use crate::models::{
    CustomerSupportDoc, DeliverySettingsDoc, GroceryItemInput, MenuItemInput, RestaurantInput,
    ValidationError,
};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A seed record failed validation.
    #[error("{id}: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },
}

/// A complete seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub restaurants: Vec<SeedRestaurant>,
    #[serde(default)]
    pub grocery_items: Vec<SeedGroceryItem>,
    #[serde(default)]
    pub orders: Vec<SeedOrder>,
    /// Only written when explicitly requested.
    #[serde(default)]
    pub settings: Option<SeedSettings>,
}

/// A restaurant and its menu.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRestaurant {
    pub id: RestaurantId,
    #[serde(default)]
    pub menu_items: Vec<SeedMenuItem>,
    #[serde(flatten)]
    pub restaurant: RestaurantInput,
}

#[derive(Debug, Deserialize)]
pub struct SeedMenuItem {
    pub id: MenuItemId,
    #[serde(flatten)]
    pub item: MenuItemInput,
}

#[derive(Debug, Deserialize)]
pub struct SeedGroceryItem {
    pub id: GroceryItemId,
    #[serde(flatten)]
    pub item: GroceryItemInput,
}

/// An order document, stored verbatim.
#[derive(Debug, Deserialize)]
pub struct SeedOrder {
    pub id: OrderId,
    #[serde(flatten)]
    pub data: Document,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedSettings {
    #[serde(default)]
    pub delivery: Option<DeliverySettingsDoc>,
    #[serde(default)]
    pub support: Option<CustomerSupportDoc>,
}

/// What a seed run wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub restaurants: usize,
    pub menu_items: usize,
    pub grocery_items: usize,
    pub orders: usize,
    pub settings_written: bool,
}

fn invalid(id: &str) -> impl FnOnce(ValidationError) -> SeedError + use<> {
    let id = id.to_string();
    move |source| SeedError::Invalid { id, source }
}

/// Write the seed data into the store.
///
/// Every record is validated before anything is written.
///
/// # Errors
///
/// Returns `SeedError::Invalid` for the first invalid record, or a store
/// error if a write fails. Writes made before a store failure are kept.
pub async fn apply(
    store: &DocumentStore,
    data: SeedData,
    include_settings: bool,
) -> Result<SeedReport, SeedError> {
    let mut restaurants = Vec::with_capacity(data.restaurants.len());
    for seed in data.restaurants {
        let restaurant = seed.restaurant.validated().map_err(invalid(seed.id.as_str()))?;
        let mut menu = Vec::with_capacity(seed.menu_items.len());
        for item in seed.menu_items {
            menu.push((
                item.item.validated().map_err(invalid(item.id.as_str()))?,
                item.id,
            ));
        }
        restaurants.push((seed.id, restaurant, menu));
    }
    let mut grocery_items = Vec::with_capacity(data.grocery_items.len());
    for seed in data.grocery_items {
        grocery_items.push((
            seed.item.validated().map_err(invalid(seed.id.as_str()))?,
            seed.id,
        ));
    }

    let mut report = SeedReport::default();

    for (id, restaurant, menu) in restaurants {
        store
            .insert(Collection::Restaurants, id.as_str(), restaurant.into_new_document()?)
            .await?;
        report.restaurants += 1;
        for (item, item_id) in menu {
            store
                .insert(
                    Collection::MenuItems,
                    item_id.as_str(),
                    item.into_new_document(&id)?,
                )
                .await?;
            report.menu_items += 1;
        }
    }

    for (item, id) in grocery_items {
        store
            .insert(Collection::GroceryItems, id.as_str(), item.into_new_document()?)
            .await?;
        report.grocery_items += 1;
    }

    for order in data.orders {
        store
            .insert(Collection::Orders, order.id.as_str(), order.data)
            .await?;
        report.orders += 1;
    }

    if include_settings && let Some(settings) = data.settings {
        let repo = SettingsRepository::new(store);
        if let Some(delivery) = settings.delivery {
            repo.update_delivery_settings(delivery).await?;
        }
        if let Some(support) = settings.support {
            repo.save_customer_support(support).await?;
        }
        report.settings_written = true;
    }

    tracing::info!(
        restaurants = report.restaurants,
        menu_items = report.menu_items,
        grocery_items = report.grocery_items,
        orders = report.orders,
        settings = report.settings_written,
        "seed applied"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::{MenuItemRepository, OrderRepository, RestaurantRepository};

    fn seed() -> SeedData {
        serde_json::from_value(json!({
            "restaurants": [{
                "id": "r_dosa",
                "name": "Dosa Hut",
                "cuisine": "South Indian",
                "menuItems": [
                    {"id": "m_masala", "name": "Masala Dosa", "price": "90", "category": "Main Course"}
                ]
            }],
            "groceryItems": [
                {"id": "g_milk", "name": "Milk", "price": 30, "stock": 12}
            ],
            "orders": [{
                "id": "o_1",
                "orderType": "food",
                "status": "pending",
                "restaurantId": "r_dosa",
                "total": 180,
                "createdAt": "2026-03-02T09:30:00Z"
            }],
            "settings": {
                "delivery": {"deliveryFeeFood": 35},
                "support": {"email": "help@quickbite.test"}
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_apply_writes_every_collection() {
        let store = DocumentStore::memory();
        let report = apply(&store, seed(), true).await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                restaurants: 1,
                menu_items: 1,
                grocery_items: 1,
                orders: 1,
                settings_written: true,
            }
        );

        let restaurant = RestaurantRepository::new(&store)
            .get(&RestaurantId::new("r_dosa"))
            .await
            .unwrap()
            .unwrap();
        assert!(restaurant.is_active);

        let menu = MenuItemRepository::new(&store)
            .list_for_restaurant(&RestaurantId::new("r_dosa"))
            .await
            .unwrap();
        assert_eq!(menu.len(), 1);

        let order = OrderRepository::new(&store)
            .get(&OrderId::new("o_1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            order.created_at.map(|t| t.to_rfc3339()),
            Some("2026-03-02T09:30:00+00:00".to_string())
        );

        let settings = SettingsRepository::new(&store);
        let delivery = settings.delivery_settings().await.unwrap();
        assert_eq!(delivery.delivery_fee_food, rust_decimal::Decimal::from(35));
        assert_eq!(delivery.delivery_zones.len(), 2);
        assert_eq!(
            settings.customer_support().await.unwrap().email,
            "help@quickbite.test"
        );
    }

    #[tokio::test]
    async fn test_apply_is_idempotent_and_skips_settings_unless_asked() {
        let store = DocumentStore::memory();
        apply(&store, seed(), false).await.unwrap();
        let report = apply(&store, seed(), false).await.unwrap();

        assert!(!report.settings_written);
        assert_eq!(store.count(Collection::Restaurants).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Orders).await.unwrap(), 1);
        assert_eq!(store.count(Collection::AppSettings).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_record_writes_nothing() {
        let store = DocumentStore::memory();
        let mut data = seed();
        data.grocery_items
            .push(serde_json::from_value(json!({"id": "g_bad", "name": "Eggs", "stock": -1})).unwrap());

        let err = apply(&store, data, true).await.unwrap_err();
        assert!(matches!(err, SeedError::Invalid { ref id, .. } if id == "g_bad"));
        assert_eq!(store.count(Collection::Restaurants).await.unwrap(), 0);
    }
}
