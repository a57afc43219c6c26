//! Order route handlers: the two order tables and the order JSON API.

use askama::Template;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quickbite_core::{OrderId, OrderStatus, OrderType, Price};

use crate::{
    components::{DataTableConfig, orders_table_config},
    db::{OrderRepository, RestaurantRepository},
    error::AppError,
    filters,
    models::{DeliveryAddress, Order, OrderFilter, OrderItem, OrderSummary, lenient, order::sort_by_recent},
    state::AppState,
};

/// Order list query parameters, shared by the HTML tables and the JSON API.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// `food` or `grocery`; every order when absent.
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub status: Option<String>,
    pub restaurant: Option<String>,
    pub search: Option<String>,
}

impl OrdersQuery {
    fn parsed_type(&self) -> Result<Option<OrderType>, AppError> {
        match self.order_type.as_deref().map(str::trim) {
            None | Some("" | "all") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("unknown order type: {raw}"))),
        }
    }

    /// The filter to apply. Grocery orders have no restaurant.
    fn filter(&self, order_type: Option<OrderType>) -> OrderFilter {
        OrderFilter {
            status: self.status.clone(),
            restaurant: if order_type == Some(OrderType::Grocery) {
                None
            } else {
                self.restaurant.clone()
            },
            search: self.search.clone(),
        }
    }
}

/// Load orders of one type (or all), filter them and sort newest first.
async fn filtered_orders(
    state: &AppState,
    order_type: Option<OrderType>,
    filter: &OrderFilter,
) -> Result<Vec<Order>, AppError> {
    let repo = OrderRepository::new(state.store());
    let orders = match order_type {
        Some(order_type) => repo.list_by_type(order_type).await?,
        None => repo.list_all().await?,
    };
    let mut orders = filter.apply(orders);
    sort_by_recent(&mut orders);
    Ok(orders)
}

// =============================================================================
// HTML tables
// =============================================================================

/// One row of an order table, formatted for display.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub table_ref: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub restaurant_name: String,
    pub item_count: usize,
    pub total: String,
    pub payment_method: String,
    pub status: String,
    pub status_label: String,
    pub updated: String,
}

impl OrderRow {
    fn new(summary: OrderSummary, currency: quickbite_core::CurrencyCode) -> Self {
        Self {
            id: summary.id.to_string(),
            table_ref: summary.table_ref,
            customer_name: summary.customer_name.unwrap_or_else(|| "N/A".to_string()),
            customer_phone: summary.customer_phone.unwrap_or_default(),
            restaurant_name: summary.restaurant_name.unwrap_or_else(|| "N/A".to_string()),
            item_count: summary.item_count,
            total: Price::new(summary.total, currency).display(),
            payment_method: summary.payment_method,
            status: summary.status,
            status_label: summary.status_label,
            updated: summary
                .last_activity
                .map(|t| t.format("%b %d, %Y %H:%M").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Order table page.
#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub current_path: String,
    pub title: String,
    pub table: DataTableConfig,
    pub default_columns: Vec<String>,
    pub show_restaurant: bool,
    pub orders: Vec<OrderRow>,
    pub active_filters: usize,
}

async fn orders_page(
    state: &AppState,
    order_type: OrderType,
    query: &OrdersQuery,
) -> Result<Html<String>, AppError> {
    let filter = query.filter(Some(order_type));
    let restaurants = if order_type == OrderType::Food {
        RestaurantRepository::new(state.store()).list().await?
    } else {
        Vec::new()
    };
    let orders = filtered_orders(state, Some(order_type), &filter).await?;

    let currency = state.config().currency;
    let table = orders_table_config(order_type, &restaurants, &filter);
    let template = OrdersTemplate {
        current_path: format!("/{}-orders", order_type.as_str()),
        title: match order_type {
            OrderType::Food => "Food Orders".to_string(),
            OrderType::Grocery => "Grocery Orders".to_string(),
        },
        default_columns: table.default_columns(),
        table,
        show_restaurant: order_type == OrderType::Food,
        orders: orders
            .iter()
            .map(|o| OrderRow::new(o.summary(), currency))
            .collect(),
        active_filters: filter.active_count(),
    };

    Ok(Html(template.render()?))
}

/// Food orders table.
///
/// GET /food-orders
#[instrument(skip(state))]
pub async fn food_orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Html<String>, AppError> {
    orders_page(&state, OrderType::Food, &query).await
}

/// Grocery orders table.
///
/// GET /grocery-orders
#[instrument(skip(state))]
pub async fn grocery_orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Html<String>, AppError> {
    orders_page(&state, OrderType::Grocery, &query).await
}

// =============================================================================
// JSON API
// =============================================================================

/// Filtered order list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
    pub total: usize,
    pub active_filters: usize,
}

/// List orders, optionally by type, filtered and newest first.
///
/// GET /api/orders?type=food&status=pending&restaurant=r1&search=ravi
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<OrderListResponse>, AppError> {
    let order_type = query.parsed_type()?;
    let filter = query.filter(order_type);
    let orders = filtered_orders(&state, order_type, &filter).await?;

    Ok(Json(OrderListResponse {
        total: orders.len(),
        orders: orders.iter().map(Order::summary).collect(),
        active_filters: filter.active_count(),
    }))
}

/// Full order with derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub items: Vec<OrderItem>,
    pub delivery_address: Option<DeliveryAddress>,
    pub delivery_address_line: Option<String>,
    /// Sum of `quantity × price` over the items.
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub items_total: Decimal,
    pub total_quantity: u32,
    #[serde(serialize_with = "lenient::serialize_decimal_opt")]
    pub subtotal: Option<Decimal>,
    #[serde(serialize_with = "lenient::serialize_decimal_opt")]
    pub delivery_fee: Option<Decimal>,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub tax_percentage: Decimal,
    #[serde(serialize_with = "lenient::serialize_decimal_opt")]
    pub tax_amount: Option<Decimal>,
    pub total_display: String,
}

impl OrderDetail {
    fn new(order: &Order, currency: quickbite_core::CurrencyCode) -> Self {
        let pricing = order.pricing.clone().unwrap_or_default();
        Self {
            summary: order.summary(),
            items: order.items.clone(),
            delivery_address: order.delivery_address.clone(),
            delivery_address_line: order
                .delivery_address
                .as_ref()
                .map(DeliveryAddress::one_line)
                .filter(|line| !line.is_empty()),
            items_total: order.items_total(),
            total_quantity: order.total_quantity(),
            subtotal: pricing.subtotal,
            delivery_fee: pricing.delivery_fee,
            tax_percentage: order.tax_percentage(),
            tax_amount: pricing.tax_amount,
            total_display: Price::new(order.total(), currency).display(),
        }
    }
}

/// Get one order.
///
/// GET /api/orders/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetail>, AppError> {
    let order = OrderRepository::new(state.store())
        .get(&OrderId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(OrderDetail::new(&order, state.config().currency)))
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Move an order to a new status.
///
/// PUT /api/orders/{id}/status
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<OrderSummary>, AppError> {
    let order = OrderRepository::new(state.store())
        .update_status(&OrderId::new(id), &body.status)
        .await?;
    Ok(Json(order.summary()))
}

/// Orders in one status, newest first.
///
/// GET /api/orders/status/{status}
#[instrument(skip(state))]
pub async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let status: OrderStatus = status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown status: {status}")))?;
    let orders = OrderRepository::new(state.store())
        .list_by_status(status)
        .await?;
    Ok(Json(orders.iter().map(Order::summary).collect()))
}
