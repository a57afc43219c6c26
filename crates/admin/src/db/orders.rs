//! Order repository.
//!
//! Food and grocery orders share the `orders` collection and are told apart
//! by `orderType`. Orders are written by the customer apps; this repository
//! only reads them and updates their status.

use std::collections::HashSet;

use serde_json::Value;

use quickbite_core::{OrderId, OrderStatus, OrderType, RestaurantId};

use super::{Collection, Condition, Document, DocumentStore, StoreError, decode, decode_or_skip};
use crate::models::Order;
use crate::models::order::sort_by_recent;

/// Error from a status update: either the store failed or the status was
/// rejected for this order.
#[derive(Debug, thiserror::Error)]
pub enum StatusUpdateError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] crate::models::ValidationError),
}

/// Repository for order documents.
pub struct OrderRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Every order of every type, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let docs = self.store.list(Collection::Orders).await?;
        Ok(decode_sorted(docs))
    }

    /// Orders of one type, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list_by_type(&self, order_type: OrderType) -> Result<Vec<Order>, StoreError> {
        self.query(&[Condition::eq("orderType", order_type.as_str())])
            .await
    }

    /// Orders with an exact status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError> {
        self.query(&[Condition::eq("status", status.as_str())]).await
    }

    /// Orders placed with a restaurant, newest first.
    ///
    /// Matches either `restaurant.restaurantId` or the older top-level
    /// `restaurantId`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    pub async fn list_by_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Order>, StoreError> {
        let nested = [Condition::eq(
            "restaurant.restaurantId",
            restaurant_id.as_str(),
        )];
        let top_level = [Condition::eq("restaurantId", restaurant_id.as_str())];
        let (nested, top_level) = tokio::try_join!(
            self.store.query(Collection::Orders, &nested),
            self.store.query(Collection::Orders, &top_level),
        )?;

        let mut seen = HashSet::new();
        let docs = nested
            .into_iter()
            .chain(top_level)
            .filter(|doc| {
                let id = doc.get("id").and_then(Value::as_str).unwrap_or_default();
                seen.insert(id.to_string())
            })
            .collect();
        Ok(decode_sorted(docs))
    }

    /// An order by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the store cannot be read.
    /// Returns `StoreError::DataCorruption` if the document is undecodable.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let Some(doc) = self.store.get(Collection::Orders, id.as_str()).await? else {
            return Ok(None);
        };
        decode(doc).map(Some)
    }

    /// Set the status of an order after checking it is allowed for the
    /// order's type. Returns the updated order.
    ///
    /// # Errors
    ///
    /// Returns `StatusUpdateError::Invalid` if the status is unknown or not
    /// allowed, and `StatusUpdateError::Store` if the order does not exist or
    /// the write fails.
    pub async fn update_status(&self, id: &OrderId, raw: &str) -> Result<Order, StatusUpdateError> {
        let order = self.get(id).await?.ok_or(StoreError::NotFound)?;
        let status = order.check_status(raw)?;

        let mut patch = Document::new();
        patch.insert("status".to_string(), Value::from(status.as_str()));
        self.store.update(Collection::Orders, id.as_str(), patch).await?;

        tracing::info!(
            order_id = %id,
            from = %order.status,
            to = status.as_str(),
            "order status updated"
        );
        Ok(self.get(id).await?.ok_or(StoreError::NotFound)?)
    }

    async fn query(&self, conditions: &[Condition]) -> Result<Vec<Order>, StoreError> {
        let docs = self.store.query(Collection::Orders, conditions).await?;
        Ok(decode_sorted(docs))
    }
}

fn decode_sorted(docs: Vec<Document>) -> Vec<Order> {
    let mut orders: Vec<Order> = docs
        .into_iter()
        .filter_map(|doc| decode_or_skip(Collection::Orders, doc))
        .collect();
    sort_by_recent(&mut orders);
    orders
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::ValidationError;

    async fn seed(store: &DocumentStore, id: &str, value: Value) {
        store
            .insert(Collection::Orders, id, value.as_object().cloned().unwrap())
            .await
            .unwrap();
    }

    async fn seeded() -> DocumentStore {
        let store = DocumentStore::memory();
        seed(
            &store,
            "food-1",
            json!({"orderType": "food", "status": "pending", "restaurant": {"restaurantId": "r1", "name": "Dosa Hut"}}),
        )
        .await;
        seed(
            &store,
            "food-2",
            json!({"orderType": "food", "status": "delivered", "restaurantId": "r1"}),
        )
        .await;
        seed(
            &store,
            "grocery-1",
            json!({"orderType": "grocery", "status": "pending"}),
        )
        .await;
        store
    }

    #[tokio::test]
    async fn test_list_by_type() {
        let store = seeded().await;
        let repo = OrderRepository::new(&store);

        let food = repo.list_by_type(OrderType::Food).await.unwrap();
        assert_eq!(food.len(), 2);
        let grocery = repo.list_by_type(OrderType::Grocery).await.unwrap();
        assert_eq!(grocery.len(), 1);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_by_restaurant_matches_both_shapes() {
        let store = seeded().await;
        let repo = OrderRepository::new(&store);

        let orders = repo
            .list_by_restaurant(&RestaurantId::new("r1"))
            .await
            .unwrap();
        let mut ids: Vec<_> = orders.iter().map(|o| o.id.as_str().to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["food-1", "food-2"]);
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let store = seeded().await;
        let repo = OrderRepository::new(&store);
        let pending = repo.list_by_status(OrderStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_checks_order_type() {
        let store = seeded().await;
        let repo = OrderRepository::new(&store);

        let packed = repo
            .update_status(&OrderId::new("grocery-1"), "packing")
            .await
            .unwrap();
        assert_eq!(packed.status, "packing");

        let err = repo
            .update_status(&OrderId::new("food-1"), "packing")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StatusUpdateError::Invalid(ValidationError::StatusNotAllowed { .. })
        ));

        let err = repo
            .update_status(&OrderId::new("missing"), "ready")
            .await
            .unwrap_err();
        assert!(matches!(err, StatusUpdateError::Store(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_status_stamps_updated_at() {
        let store = seeded().await;
        let repo = OrderRepository::new(&store);
        let order = repo
            .update_status(&OrderId::new("food-1"), "out-for-delivery")
            .await
            .unwrap();
        assert_eq!(order.status_label(), "Out for Delivery");
        assert!(order.updated_at.is_some());
    }
}
