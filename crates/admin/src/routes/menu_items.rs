//! Menu item route handlers.
//!
//! Listing and creation are restaurant-scoped and live in
//! [`super::restaurants`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use quickbite_core::MenuItemId;

use crate::{
    db::MenuItemRepository,
    error::AppError,
    models::{MenuItem, MenuItemInput},
    state::AppState,
};

/// Update a menu item.
///
/// PUT /api/menu-items/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MenuItemInput>,
) -> Result<Json<MenuItem>, AppError> {
    let input = input.validated()?;
    let item = MenuItemRepository::new(state.store())
        .update(&MenuItemId::new(id), input)
        .await?;
    Ok(Json(item))
}

/// Delete a menu item.
///
/// DELETE /api/menu-items/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    MenuItemRepository::new(state.store())
        .delete(&MenuItemId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a menu item's `available` flag.
///
/// POST /api/menu-items/{id}/toggle-available
#[instrument(skip(state))]
pub async fn toggle_available(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItem>, AppError> {
    let item = MenuItemRepository::new(state.store())
        .toggle_available(&MenuItemId::new(id))
        .await?;
    Ok(Json(item))
}
