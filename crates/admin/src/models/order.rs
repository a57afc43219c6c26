//! Order models.
//!
//! Orders are written by the customer apps, so their shape varies: totals may
//! live in `pricing.grandTotal`, `total`, `amount` or `totalAmount`, and the
//! customer contact may only be present on the delivery address. The methods
//! on [`Order`] resolve those fallbacks in one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbite_core::{OrderId, OrderStatus, OrderType};

use super::{ValidationError, lenient};

/// Payment method shown when an order does not record one.
pub const DEFAULT_PAYMENT_METHOD: &str = "COD";

/// Tax percentage shown when an order's pricing does not record one.
pub const DEFAULT_TAX_PERCENTAGE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A customer order as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, deserialize_with = "order_type")]
    pub order_type: Option<OrderType>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "optional_object")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(default, deserialize_with = "optional_object")]
    pub restaurant: Option<OrderRestaurant>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub restaurant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub item_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_object")]
    pub pricing: Option<Pricing>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub total: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub amount: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub total_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub payment_method: Option<String>,
    #[serde(default = "default_status", deserialize_with = "status")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where an order is delivered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub village_town: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub landmark: Option<String>,
}

impl DeliveryAddress {
    /// Address lines joined for display, skipping blanks.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.village_town,
            &self.city,
            &self.state,
            &self.zip_code,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Restaurant reference embedded in food orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRestaurant {
    #[serde(default, deserialize_with = "lenient::string")]
    pub restaurant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub weight: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity: Option<u32>,
}

impl OrderItem {
    /// `quantity × price`, treating missing values as zero. Saturates
    /// instead of overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity.unwrap_or(0)).saturating_mul(self.price.unwrap_or_default())
    }
}

/// Price breakdown recorded at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub subtotal: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub delivery_fee: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub tax_percentage: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub tax_amount: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt"
    )]
    pub grand_total: Option<Decimal>,
}

impl Order {
    /// Monetary total: the first non-zero of `pricing.grandTotal`, `total`,
    /// `amount`, `totalAmount`; zero when none is usable.
    #[must_use]
    pub fn total(&self) -> Decimal {
        [
            self.pricing.as_ref().and_then(|p| p.grand_total),
            self.total,
            self.amount,
            self.total_amount,
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.is_zero())
        .unwrap_or_default()
    }

    /// Customer name, falling back to the delivery address.
    #[must_use]
    pub fn customer_name(&self) -> Option<&str> {
        non_blank(self.customer_name.as_deref()).or_else(|| {
            non_blank(
                self.delivery_address
                    .as_ref()
                    .and_then(|a| a.name.as_deref()),
            )
        })
    }

    /// Customer phone, falling back to the delivery address.
    #[must_use]
    pub fn customer_phone(&self) -> Option<&str> {
        non_blank(self.customer_phone.as_deref()).or_else(|| {
            non_blank(
                self.delivery_address
                    .as_ref()
                    .and_then(|a| a.phone.as_deref()),
            )
        })
    }

    /// Restaurant id from the embedded reference, else the top-level field.
    #[must_use]
    pub fn restaurant_id(&self) -> Option<&str> {
        non_blank(
            self.restaurant
                .as_ref()
                .and_then(|r| r.restaurant_id.as_deref()),
        )
        .or_else(|| non_blank(self.restaurant_id.as_deref()))
    }

    /// Restaurant display name, if embedded.
    #[must_use]
    pub fn restaurant_name(&self) -> Option<&str> {
        non_blank(self.restaurant.as_ref().and_then(|r| r.name.as_deref()))
    }

    /// Recorded item count, else the number of lines.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
            .filter(|count| *count > 0)
            .map_or(self.items.len(), |count| count as usize)
    }

    /// Σ quantity × price over the lines.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items
            .iter()
            .map(OrderItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Σ quantity over the lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.quantity.unwrap_or(0))
            .fold(0, u32::saturating_add)
    }

    /// Timestamp used for recency ordering.
    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    /// Payment method for display.
    #[must_use]
    pub fn payment_method(&self) -> &str {
        non_blank(self.payment_method.as_deref()).unwrap_or(DEFAULT_PAYMENT_METHOD)
    }

    /// Tax percentage for display.
    #[must_use]
    pub fn tax_percentage(&self) -> Decimal {
        self.pricing
            .as_ref()
            .and_then(|p| p.tax_percentage)
            .unwrap_or(DEFAULT_TAX_PERCENTAGE)
    }

    /// Label for the stored status.
    #[must_use]
    pub fn status_label(&self) -> String {
        OrderStatus::label_for(&self.status)
    }

    /// Check that `raw` may be applied to this order.
    ///
    /// Orders without a recognised type accept any known status.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the status is unknown or not allowed for
    /// the order's type.
    pub fn check_status(&self, raw: &str) -> Result<OrderStatus, ValidationError> {
        let status: OrderStatus = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::UnknownStatus(raw.to_string()))?;
        match self.order_type {
            Some(order_type) if !status.is_allowed_for(order_type) => {
                Err(ValidationError::StatusNotAllowed {
                    status: status.as_str().to_string(),
                    order_type,
                })
            }
            _ => Ok(status),
        }
    }

    /// Flattened row for tables and list responses.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id.clone(),
            table_ref: self.id.table_ref(),
            order_type: self.order_type,
            customer_name: self.customer_name().map(ToString::to_string),
            customer_phone: self.customer_phone().map(ToString::to_string),
            restaurant_id: self.restaurant_id().map(ToString::to_string),
            restaurant_name: self.restaurant_name().map(ToString::to_string),
            item_count: self.item_count(),
            total: self.total(),
            payment_method: self.payment_method().to_string(),
            status: self.status.clone(),
            status_label: self.status_label(),
            last_activity: self.last_activity(),
        }
    }
}

/// Order row with every fallback resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    /// `#` plus the last six characters of the id.
    pub table_ref: String,
    pub order_type: Option<OrderType>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub item_count: usize,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub total: Decimal,
    pub payment_method: String,
    pub status: String,
    pub status_label: String,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Filters applied to an order list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    /// Exact status match.
    #[serde(default)]
    pub status: Option<String>,
    /// Restaurant id match (food orders).
    #[serde(default)]
    pub restaurant: Option<String>,
    /// Case-insensitive substring over id, customer name and phone.
    #[serde(default)]
    pub search: Option<String>,
}

impl OrderFilter {
    /// Whether an order passes every active filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = active(self.status.as_deref())
            && order.status != status
        {
            return false;
        }

        if let Some(restaurant) = active(self.restaurant.as_deref())
            && order.restaurant_id() != Some(restaurant)
        {
            return false;
        }

        if let Some(search) = active(self.search.as_deref()) {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(order.id.as_str()),
                order.customer_name(),
                order.customer_phone(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|hay| hay.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        true
    }

    /// Keep the orders that pass.
    #[must_use]
    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        orders.into_iter().filter(|o| self.matches(o)).collect()
    }

    /// Number of filters that are set.
    #[must_use]
    pub fn active_count(&self) -> usize {
        [&self.status, &self.restaurant, &self.search]
            .into_iter()
            .filter(|value| active(value.as_deref()).is_some())
            .count()
    }
}

/// Sort newest first by last activity; orders without timestamps go last.
pub fn sort_by_recent(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
}

fn active(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != "all")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_status() -> String {
    OrderStatus::default().as_str().to_string()
}

fn status<'de, D: serde::Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient::string(d)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_status))
}

fn order_type<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<OrderType>, D::Error> {
    Ok(lenient::string(d)?.and_then(|s| s.parse().ok()))
}

fn optional_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match serde_json::Value::deserialize(d)? {
        value @ serde_json::Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(value: serde_json::Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_total_fallback_chain() {
        let with_grand_total = order(json!({
            "id": "o1",
            "pricing": {"grandTotal": 250},
            "total": 100
        }));
        assert_eq!(with_grand_total.total(), Decimal::from(250));

        let zero_grand_total = order(json!({
            "id": "o2",
            "pricing": {"grandTotal": 0},
            "total": "120.50"
        }));
        assert_eq!(zero_grand_total.total(), Decimal::new(12050, 2));

        let amount_only = order(json!({"id": "o3", "total": "n/a", "amount": 75}));
        assert_eq!(amount_only.total(), Decimal::from(75));

        let total_amount_only = order(json!({"id": "o4", "totalAmount": 60}));
        assert_eq!(total_amount_only.total(), Decimal::from(60));

        let nothing = order(json!({"id": "o5"}));
        assert_eq!(nothing.total(), Decimal::ZERO);
    }

    #[test]
    fn test_customer_falls_back_to_delivery_address() {
        let o = order(json!({
            "id": "o1",
            "customerName": "",
            "deliveryAddress": {"name": "Asha", "phone": 9_876_543_210_u64}
        }));
        assert_eq!(o.customer_name(), Some("Asha"));
        assert_eq!(o.customer_phone(), Some("9876543210"));
    }

    #[test]
    fn test_restaurant_id_prefers_embedded_reference() {
        let embedded = order(json!({
            "id": "o1",
            "restaurant": {"restaurantId": "r1", "name": "Dosa Hut"},
            "restaurantId": "r2"
        }));
        assert_eq!(embedded.restaurant_id(), Some("r1"));
        assert_eq!(embedded.restaurant_name(), Some("Dosa Hut"));

        let top_level = order(json!({"id": "o2", "restaurantId": "r2"}));
        assert_eq!(top_level.restaurant_id(), Some("r2"));
    }

    #[test]
    fn test_item_totals() {
        let o = order(json!({
            "id": "o1",
            "items": [
                {"name": "Atta", "price": 55, "quantity": 2},
                {"name": "Dal", "price": "120.5", "quantity": "1"},
                "garbage"
            ]
        }));
        assert_eq!(o.items.len(), 2);
        assert_eq!(o.items_total(), Decimal::new(2305, 1));
        assert_eq!(o.total_quantity(), 3);
        assert_eq!(o.item_count(), 2);

        let counted = order(json!({"id": "o2", "itemCount": 7}));
        assert_eq!(counted.item_count(), 7);
    }

    #[test]
    fn test_defaults_for_display() {
        let o = order(json!({"id": "o1", "status": null}));
        assert_eq!(o.status, "pending");
        assert_eq!(o.payment_method(), "COD");
        assert_eq!(o.tax_percentage(), Decimal::from(5));
        assert_eq!(o.status_label(), "Pending");
    }

    #[test]
    fn test_malformed_nested_values_read_as_absent() {
        let o = order(json!({
            "id": "o1",
            "orderType": "drinks",
            "pricing": "free",
            "deliveryAddress": 12,
            "items": {"not": "a list"}
        }));
        assert!(o.order_type.is_none());
        assert!(o.pricing.is_none());
        assert!(o.delivery_address.is_none());
        assert!(o.items.is_empty());
    }

    #[test]
    fn test_check_status_by_type() {
        let food = order(json!({"id": "o1", "orderType": "food"}));
        assert_eq!(food.check_status("ready"), Ok(OrderStatus::Ready));
        assert!(matches!(
            food.check_status("packing"),
            Err(ValidationError::StatusNotAllowed { .. })
        ));
        assert!(matches!(
            food.check_status("teleported"),
            Err(ValidationError::UnknownStatus(_))
        ));

        let grocery = order(json!({"id": "o2", "orderType": "grocery"}));
        assert_eq!(grocery.check_status("packing"), Ok(OrderStatus::Packing));
    }

    #[test]
    fn test_filter_matches_search_and_restaurant() {
        let o = order(json!({
            "id": "abc123XYZ",
            "customerName": "Ravi Kumar",
            "customerPhone": "98450 12345",
            "restaurantId": "r1",
            "status": "preparing"
        }));

        let by_name = OrderFilter {
            search: Some("ravi".to_string()),
            ..OrderFilter::default()
        };
        assert!(by_name.matches(&o));

        let by_id = OrderFilter {
            search: Some("xyz".to_string()),
            ..OrderFilter::default()
        };
        assert!(by_id.matches(&o));

        let wrong_restaurant = OrderFilter {
            restaurant: Some("r2".to_string()),
            ..OrderFilter::default()
        };
        assert!(!wrong_restaurant.matches(&o));

        let all = OrderFilter {
            status: Some("all".to_string()),
            restaurant: Some("r1".to_string()),
            search: Some("  ".to_string()),
        };
        assert!(all.matches(&o));
        assert_eq!(all.active_count(), 1);
    }

    #[test]
    fn test_sort_by_recent_puts_undated_last() {
        let mut orders = vec![
            order(json!({"id": "old", "createdAt": "2026-01-01T00:00:00Z"})),
            order(json!({"id": "none"})),
            order(json!({"id": "new", "updatedAt": "2026-02-01T00:00:00Z", "createdAt": "2025-01-01T00:00:00Z"})),
        ];
        sort_by_recent(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
    }

    #[test]
    fn test_items_total_saturates_on_huge_prices() {
        let huge = order(json!({
            "id": "o-huge",
            "items": [
                {"name": "Gold", "price": "50000000000000000000000000000", "quantity": 2},
                {"name": "Gold", "price": "50000000000000000000000000000", "quantity": 1}
            ]
        }));
        assert_eq!(huge.items[0].line_total(), Decimal::MAX);
        assert_eq!(huge.items_total(), Decimal::MAX);
    }

    #[test]
    fn test_total_quantity_saturates() {
        let many = order(json!({
            "id": "o-many",
            "items": [{"quantity": 4_000_000_000u32}, {"quantity": 4_000_000_000u32}]
        }));
        assert_eq!(many.total_quantity(), u32::MAX);
    }
}
