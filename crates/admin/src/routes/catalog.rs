//! Catalog form options.

use axum::Json;
use serde::Serialize;

use crate::models::{GROCERY_CATEGORIES, MENU_CATEGORIES};

/// Category options for the menu item and grocery item forms.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub menu: &'static [&'static str],
    pub grocery: &'static [&'static str],
}

/// GET /api/catalog/categories
pub async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        menu: MENU_CATEGORIES,
        grocery: GROCERY_CATEGORIES,
    })
}
