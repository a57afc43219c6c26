//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Pages
//! GET  /                       - Dashboard overview
//! GET  /food-orders            - Food orders table
//! GET  /grocery-orders         - Grocery orders table
//!
//! # Dashboard API
//! GET  /api/dashboard          - Dashboard snapshot
//!
//! # Restaurants
//! GET    /api/restaurants                   - List restaurants
//! POST   /api/restaurants                   - Create restaurant
//! GET    /api/restaurants/{id}              - Restaurant detail
//! PUT    /api/restaurants/{id}              - Update restaurant
//! DELETE /api/restaurants/{id}              - Delete restaurant
//! POST   /api/restaurants/{id}/toggle-active
//! GET    /api/restaurants/{id}/menu-items   - Restaurant menu
//! POST   /api/restaurants/{id}/menu-items   - Add menu item
//! GET    /api/restaurants/{id}/orders       - Restaurant orders
//!
//! # Menu items
//! PUT    /api/menu-items/{id}
//! DELETE /api/menu-items/{id}
//! POST   /api/menu-items/{id}/toggle-available
//!
//! # Grocery items
//! GET    /api/grocery-items?activeOnly=
//! POST   /api/grocery-items
//! PUT    /api/grocery-items/{id}
//! DELETE /api/grocery-items/{id}              - Soft delete
//! POST   /api/grocery-items/{id}/toggle-active
//! GET    /api/catalog/categories              - Form category options
//!
//! # Orders
//! GET  /api/orders?type=&status=&restaurant=&search=
//! GET  /api/orders/{id}
//! PUT  /api/orders/{id}/status
//! GET  /api/orders/status/{status}
//!
//! # Settings
//! GET/PUT /api/settings/delivery
//! POST    /api/settings/zones
//! PUT     /api/settings/zones/{id}
//! DELETE  /api/settings/zones/{id}
//! POST    /api/settings/zones/{id}/toggle-active
//! GET     /api/settings/zones/lookup?zip=&orderType=
//! GET     /api/settings/zones/overlaps
//! GET/PUT /api/settings/support
//! ```

pub mod catalog;
pub mod dashboard;
pub mod grocery_items;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod settings;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the restaurant routes router.
pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(restaurants::index).post(restaurants::create))
        .route(
            "/{id}",
            get(restaurants::show)
                .put(restaurants::update)
                .delete(restaurants::delete),
        )
        .route("/{id}/toggle-active", post(restaurants::toggle_active))
        .route(
            "/{id}/menu-items",
            get(restaurants::menu_items).post(restaurants::create_menu_item),
        )
        .route("/{id}/orders", get(restaurants::orders))
}

/// Create the menu item routes router.
pub fn menu_item_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(menu_items::update).delete(menu_items::delete))
        .route("/{id}/toggle-available", post(menu_items::toggle_available))
}

/// Create the grocery item routes router.
pub fn grocery_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(grocery_items::index).post(grocery_items::create))
        .route(
            "/{id}",
            put(grocery_items::update).delete(grocery_items::delete),
        )
        .route("/{id}/toggle-active", post(grocery_items::toggle_active))
}

/// Create the order API routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/status/{status}", get(orders::by_status))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/delivery",
            get(settings::delivery).put(settings::update_delivery),
        )
        .route("/zones", post(settings::create_zone))
        .route("/zones/lookup", get(settings::lookup_zone))
        .route("/zones/overlaps", get(settings::zone_overlap_report))
        .route(
            "/zones/{id}",
            put(settings::update_zone).delete(settings::delete_zone),
        )
        .route("/zones/{id}/toggle-active", post(settings::toggle_zone))
        .route(
            "/support",
            get(settings::support).put(settings::update_support),
        )
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::snapshot))
        .route("/catalog/categories", get(catalog::categories))
        .nest("/restaurants", restaurant_routes())
        .nest("/menu-items", menu_item_routes())
        .nest("/grocery-items", grocery_item_routes())
        .nest("/orders", order_routes())
        .nest("/settings", settings_routes())
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Pages
        .route("/", get(dashboard::index))
        .route("/food-orders", get(orders::food_orders))
        .route("/grocery-orders", get(orders::grocery_orders))
        // JSON API
        .nest("/api", api_routes())
}
