//! Grocery item route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use quickbite_core::GroceryItemId;

use crate::{
    db::GroceryItemRepository,
    error::AppError,
    models::{GroceryItem, GroceryItemInput},
    state::AppState,
};

/// Grocery list query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryListQuery {
    /// Leave out soft-deleted items.
    #[serde(default)]
    pub active_only: bool,
}

/// List grocery items.
///
/// GET /api/grocery-items?activeOnly=true
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<GroceryListQuery>,
) -> Result<Json<Vec<GroceryItem>>, AppError> {
    let items = GroceryItemRepository::new(state.store())
        .list(query.active_only)
        .await?;
    Ok(Json(items))
}

/// Create a grocery item.
///
/// POST /api/grocery-items
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<GroceryItemInput>,
) -> Result<(StatusCode, Json<GroceryItem>), AppError> {
    let input = input.validated()?;
    let item = GroceryItemRepository::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a grocery item.
///
/// PUT /api/grocery-items/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<GroceryItemInput>,
) -> Result<Json<GroceryItem>, AppError> {
    let input = input.validated()?;
    let item = GroceryItemRepository::new(state.store())
        .update(&GroceryItemId::new(id), input)
        .await?;
    Ok(Json(item))
}

/// Soft-delete a grocery item. The document stays with `isActive: false`.
///
/// DELETE /api/grocery-items/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let item = GroceryItemRepository::new(state.store())
        .soft_delete(&GroceryItemId::new(id))
        .await?;
    tracing::info!(id = %item.id, "Grocery item deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a grocery item's `isActive` flag.
///
/// POST /api/grocery-items/{id}/toggle-active
#[instrument(skip(state))]
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GroceryItem>, AppError> {
    let item = GroceryItemRepository::new(state.store())
        .toggle_active(&GroceryItemId::new(id))
        .await?;
    Ok(Json(item))
}
