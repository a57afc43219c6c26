//! Restaurant route handlers.
//!
//! Menu items and orders of a restaurant are reached through
//! `/api/restaurants/{id}/...`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use quickbite_core::RestaurantId;

use crate::{
    db::{MenuItemRepository, OrderRepository, RestaurantRepository},
    error::AppError,
    models::{MenuItem, MenuItemInput, OrderSummary, Restaurant, RestaurantInput},
    state::AppState,
};

/// List all restaurants.
///
/// GET /api/restaurants
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Restaurant>>, AppError> {
    let restaurants = RestaurantRepository::new(state.store()).list().await?;
    Ok(Json(restaurants))
}

/// Create a restaurant.
///
/// POST /api/restaurants
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<RestaurantInput>,
) -> Result<(StatusCode, Json<Restaurant>), AppError> {
    let input = input.validated()?;
    let restaurant = RestaurantRepository::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Get a restaurant.
///
/// GET /api/restaurants/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>, AppError> {
    RestaurantRepository::new(state.store())
        .get(&RestaurantId::new(id.clone()))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))
}

/// Update a restaurant.
///
/// PUT /api/restaurants/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RestaurantInput>,
) -> Result<Json<Restaurant>, AppError> {
    let input = input.validated()?;
    let restaurant = RestaurantRepository::new(state.store())
        .update(&RestaurantId::new(id), input)
        .await?;
    Ok(Json(restaurant))
}

/// Delete a restaurant. Menu items and orders are kept.
///
/// DELETE /api/restaurants/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    RestaurantRepository::new(state.store())
        .delete(&RestaurantId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a restaurant's `isActive` flag.
///
/// POST /api/restaurants/{id}/toggle-active
#[instrument(skip(state))]
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>, AppError> {
    let restaurant = RestaurantRepository::new(state.store())
        .toggle_active(&RestaurantId::new(id))
        .await?;
    Ok(Json(restaurant))
}

/// List a restaurant's menu.
///
/// GET /api/restaurants/{id}/menu-items
#[instrument(skip(state))]
pub async fn menu_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let items = MenuItemRepository::new(state.store())
        .list_for_restaurant(&RestaurantId::new(id))
        .await?;
    Ok(Json(items))
}

/// Add a menu item to a restaurant.
///
/// POST /api/restaurants/{id}/menu-items
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    let input = input.validated()?;
    let restaurant_id = RestaurantId::new(id);
    if RestaurantRepository::new(state.store())
        .get(&restaurant_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!("restaurant {restaurant_id}")));
    }
    let item = MenuItemRepository::new(state.store())
        .create(&restaurant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Orders placed with a restaurant, newest first.
///
/// GET /api/restaurants/{id}/orders
#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let orders = OrderRepository::new(state.store())
        .list_by_restaurant(&RestaurantId::new(id))
        .await?;
    Ok(Json(orders.iter().map(|o| o.summary()).collect()))
}
