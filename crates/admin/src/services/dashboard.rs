//! Dashboard aggregation.
//!
//! [`load`] reads restaurants, orders and grocery items concurrently and hands
//! them to [`build`], which is pure so it can be tested without a store.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use quickbite_core::{CurrencyCode, OrderId, OrderType, Price};

use crate::db::{
    DocumentStore, GroceryItemRepository, OrderRepository, RestaurantRepository, StoreError,
};
use crate::models::{GroceryItem, Order, Restaurant, lenient};

/// Number of orders shown in the recent orders panel.
pub const RECENT_ORDERS: usize = 5;
/// Number of calendar months in the sales trend, current month included.
pub const TREND_MONTHS: u32 = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Everything the dashboard shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub order_types: Vec<OrderTypeShare>,
    pub recent_orders: Vec<RecentOrder>,
    pub sales_trend: Vec<MonthlySales>,
    pub generated_at: DateTime<Utc>,
}

/// Headline counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_restaurants: usize,
    /// Every order, including those without an `orderType`.
    pub total_orders: usize,
    pub food_orders: usize,
    pub grocery_orders: usize,
    pub total_grocery_items: usize,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub food_sales: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub grocery_sales: Decimal,
    /// Food plus grocery sales.
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub total_sales: Decimal,
    pub total_sales_display: String,
}

/// One slice of the order-type chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTypeShare {
    pub name: &'static str,
    pub order_type: OrderType,
    pub count: usize,
    /// Share of all orders, rounded half-up; 0 when there are no orders.
    pub percent: u32,
    /// e.g. `Food: 3 (60%)`.
    pub label: String,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub sales: Decimal,
    pub sales_display: String,
}

/// A row in the recent orders panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: OrderId,
    /// `#` plus the last eight characters of the id, upper-cased.
    pub reference: String,
    pub order_type: Option<OrderType>,
    pub display_type: String,
    pub customer_name: Option<String>,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub total: Decimal,
    pub total_display: String,
    pub status: String,
    pub status_label: String,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// Short month name, e.g. `Mar`.
    pub name: &'static str,
    pub year: i32,
    pub month: u32,
    pub orders: usize,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub sales: Decimal,
}

/// Fetch the three collections concurrently and aggregate them.
///
/// # Errors
///
/// Returns the first `StoreError` from any of the reads; no partial snapshot
/// is produced.
pub async fn load(
    store: &DocumentStore,
    currency: CurrencyCode,
) -> Result<DashboardSnapshot, StoreError> {
    let restaurants = RestaurantRepository::new(store);
    let orders = OrderRepository::new(store);
    let grocery_items = GroceryItemRepository::new(store);

    let (restaurants, orders, grocery_items) = tokio::try_join!(
        restaurants.list(),
        orders.list_all(),
        grocery_items.list(false),
    )
    .inspect_err(|e| tracing::error!(error = %e, "failed to load dashboard data"))?;

    Ok(build(&restaurants, orders, &grocery_items, Utc::now(), currency))
}

/// Aggregate already-fetched data into a snapshot.
#[must_use]
pub fn build(
    restaurants: &[Restaurant],
    mut orders: Vec<Order>,
    grocery_items: &[GroceryItem],
    now: DateTime<Utc>,
    currency: CurrencyCode,
) -> DashboardSnapshot {
    let total_orders = orders.len();
    let (food_orders, food_sales) = tally(&orders, OrderType::Food);
    let (grocery_orders, grocery_sales) = tally(&orders, OrderType::Grocery);
    let total_sales = food_sales.saturating_add(grocery_sales);

    let order_types = [
        (OrderType::Food, "Food", food_orders, food_sales),
        (OrderType::Grocery, "Grocery", grocery_orders, grocery_sales),
    ]
    .into_iter()
    .map(|(order_type, name, count, sales)| {
        let percent = percent_of(count, total_orders);
        OrderTypeShare {
            name,
            order_type,
            count,
            percent,
            label: format!("{name}: {count} ({percent}%)"),
            sales,
            sales_display: Price::new(sales, currency).display(),
        }
    })
    .collect();

    let sales_trend = sales_trend(&orders, now);

    crate::models::order::sort_by_recent(&mut orders);
    let recent_orders = orders
        .iter()
        .take(RECENT_ORDERS)
        .map(|order| {
            let total = order.total();
            RecentOrder {
                id: order.id.clone(),
                reference: order.id.dashboard_ref(),
                order_type: order.order_type,
                // Anything that is not a food order reads as grocery.
                display_type: order
                    .order_type
                    .unwrap_or(OrderType::Grocery)
                    .label()
                    .to_string(),
                customer_name: order.customer_name().map(ToString::to_string),
                total,
                total_display: Price::new(total, currency).display(),
                status: order.status.clone(),
                status_label: order.status_label(),
                last_activity: order.last_activity(),
            }
        })
        .collect();

    DashboardSnapshot {
        stats: DashboardStats {
            total_restaurants: restaurants.len(),
            total_orders,
            food_orders,
            grocery_orders,
            total_grocery_items: grocery_items.len(),
            food_sales,
            grocery_sales,
            total_sales,
            total_sales_display: Price::new(total_sales, currency).display(),
        },
        order_types,
        recent_orders,
        sales_trend,
        generated_at: now,
    }
}

/// Count and sales of orders of one type.
fn tally(orders: &[Order], order_type: OrderType) -> (usize, Decimal) {
    orders
        .iter()
        .filter(|o| o.order_type == Some(order_type))
        .fold((0, Decimal::ZERO), |(count, sales), o| {
            (count + 1, sales.saturating_add(o.total()))
        })
}

/// `count / total * 100`, rounded half-up.
fn percent_of(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (count * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Typed-order sales per calendar month for the last [`TREND_MONTHS`] months,
/// oldest first. Orders are placed in the month of `createdAt`, falling back
/// to `updatedAt`; undated orders are left out.
fn sales_trend(orders: &[Order], now: DateTime<Utc>) -> Vec<MonthlySales> {
    let current = month_index(now.year(), now.month());
    let mut trend: Vec<MonthlySales> = (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let index = current - i64::from(back);
            let (year, month) = from_month_index(index);
            MonthlySales {
                name: usize::try_from(month - 1)
                    .ok()
                    .and_then(|i| MONTH_NAMES.get(i))
                    .copied()
                    .unwrap_or_default(),
                year,
                month,
                orders: 0,
                sales: Decimal::ZERO,
            }
        })
        .collect();

    let first = current - i64::from(TREND_MONTHS - 1);
    for order in orders.iter().filter(|o| o.order_type.is_some()) {
        let Some(at) = order.created_at.or(order.updated_at) else {
            continue;
        };
        let index = month_index(at.year(), at.month());
        let slot = usize::try_from(index - first)
            .ok()
            .and_then(|i| trend.get_mut(i));
        if let Some(slot) = slot {
            slot.orders += 1;
            slot.sales = slot.sales.saturating_add(order.total());
        }
    }
    trend
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

fn from_month_index(index: i64) -> (i32, u32) {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) + 1;
    (
        i32::try_from(year).unwrap_or_default(),
        u32::try_from(month).unwrap_or(1),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use super::*;

    fn order(value: Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn sample_orders() -> Vec<Order> {
        vec![
            order(json!({"id": "food-000001", "orderType": "food", "pricing": {"grandTotal": 250}, "createdAt": "2026-03-01T10:00:00Z"})),
            order(json!({"id": "food-000002", "orderType": "food", "total": "150.50", "createdAt": "2026-02-10T10:00:00Z"})),
            order(json!({"id": "food-000003", "orderType": "food", "pricing": {"grandTotal": 0}, "amount": 99.5, "createdAt": "2025-09-30T10:00:00Z"})),
            order(json!({"id": "groc-000001", "orderType": "grocery", "totalAmount": 400, "updatedAt": "2026-03-10T10:00:00Z"})),
            order(json!({"id": "groc-000002", "orderType": "grocery", "total": "abc"})),
            order(json!({"id": "legacy-0001", "total": 1000, "createdAt": "2026-03-02T10:00:00Z"})),
        ]
    }

    #[test]
    fn test_stats_partition_by_type() {
        let snapshot = build(&[], sample_orders(), &[], now(), CurrencyCode::INR);
        let stats = &snapshot.stats;

        assert_eq!(stats.total_orders, 6);
        assert_eq!(stats.food_orders, 3);
        assert_eq!(stats.grocery_orders, 2);
        assert_eq!(stats.food_sales, Decimal::new(5000, 1));
        assert_eq!(stats.grocery_sales, Decimal::from(400));
        assert_eq!(stats.total_sales, Decimal::new(9000, 1));
        assert_eq!(stats.total_sales_display, "₹900.00");
    }

    #[test]
    fn test_order_type_labels() {
        let snapshot = build(&[], sample_orders(), &[], now(), CurrencyCode::INR);
        assert_eq!(snapshot.order_types[0].label, "Food: 3 (50%)");
        assert_eq!(snapshot.order_types[1].label, "Grocery: 2 (33%)");
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(3, 3), 100);
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let snapshot = build(&[], sample_orders(), &[], now(), CurrencyCode::INR);
        let refs: Vec<_> = snapshot
            .recent_orders
            .iter()
            .map(|o| o.reference.as_str())
            .collect();
        assert_eq!(refs.len(), RECENT_ORDERS);
        assert_eq!(refs[0], "#C-000001");
        assert_eq!(refs[1], "#ACY-0001");
        assert_eq!(snapshot.recent_orders[0].display_type, "Grocery Order");
        assert_eq!(snapshot.recent_orders[1].display_type, "Grocery Order");
        assert_eq!(snapshot.recent_orders[1].order_type, None);
        assert!(snapshot.recent_orders.iter().all(|o| o.id.as_str() != "groc-000002"));
    }

    #[test]
    fn test_sales_trend_covers_six_months() {
        let snapshot = build(&[], sample_orders(), &[], now(), CurrencyCode::INR);
        let trend = &snapshot.sales_trend;

        let names: Vec<_> = trend.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(trend[0].year, 2025);
        assert_eq!(trend[5].sales, Decimal::from(650));
        assert_eq!(trend[5].orders, 2);
        assert_eq!(trend[4].sales, Decimal::new(15050, 2));
        assert!(trend.iter().take(4).all(|m| m.orders == 0));
    }

    #[test]
    fn test_empty_dashboard() {
        let snapshot = build(&[], Vec::new(), &[], now(), CurrencyCode::USD);
        assert_eq!(snapshot.stats.total_sales_display, "$0.00");
        assert_eq!(snapshot.order_types[0].label, "Food: 0 (0%)");
        assert!(snapshot.recent_orders.is_empty());
        assert_eq!(snapshot.sales_trend.len(), 6);
    }

    #[tokio::test]
    async fn test_load_reads_store() {
        let store = DocumentStore::memory();
        for (id, value) in [
            ("o1", json!({"orderType": "food", "total": 100})),
            ("o2", json!({"orderType": "grocery", "total": 50})),
        ] {
            store
                .insert(
                    crate::db::Collection::Orders,
                    id,
                    value.as_object().cloned().unwrap(),
                )
                .await
                .unwrap();
        }
        store
            .insert(
                crate::db::Collection::Restaurants,
                "r1",
                json!({"name": "Dosa Hut"}).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();

        let snapshot = load(&store, CurrencyCode::INR).await.unwrap();
        assert_eq!(snapshot.stats.total_restaurants, 1);
        assert_eq!(snapshot.stats.total_sales, Decimal::from(150));
        assert_eq!(snapshot.sales_trend.last().unwrap().orders, 2);
    }

    #[test]
    fn test_huge_totals_saturate() {
        let orders = vec![
            order(json!({"id": "food-big-1", "orderType": "food", "total": "50000000000000000000000000000", "createdAt": "2026-03-01T10:00:00Z"})),
            order(json!({"id": "food-big-2", "orderType": "food", "total": "50000000000000000000000000000", "createdAt": "2026-03-02T10:00:00Z"})),
            order(json!({"id": "groc-big-1", "orderType": "grocery", "total": "50000000000000000000000000000", "createdAt": "2026-03-03T10:00:00Z"})),
        ];
        let snapshot = build(&[], orders, &[], now(), CurrencyCode::INR);
        assert_eq!(snapshot.order_types[0].sales, Decimal::MAX);
        assert_eq!(snapshot.stats.total_sales, Decimal::MAX);
        assert_eq!(snapshot.sales_trend.last().unwrap().sales, Decimal::MAX);
    }
}
