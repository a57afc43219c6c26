//! Restaurant menu item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quickbite_core::{MenuItemId, RestaurantId};

use super::{ValidationError, lenient, require_name, require_non_negative};
use crate::db::{Document, StoreError, to_document};

/// Category options offered by the menu item form.
pub const MENU_CATEGORIES: &[&str] = &[
    "Appetizers",
    "Main Course",
    "Biryani",
    "Breads",
    "Rice",
    "Chinese",
    "South Indian",
    "Desserts",
    "Beverages",
    "Snacks",
];

/// A dish offered by one restaurant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    /// Owning restaurant. Items without one are orphans and never listed.
    pub restaurant_id: Option<RestaurantId>,
    pub name: String,
    pub category: String,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub price: Decimal,
    pub description: String,
    pub available: bool,
    /// Emoji shown when there is no photo.
    pub image: String,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Menu item fields accepted on create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItemInput {
    /// Validate and normalize the input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is blank or the price negative.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = require_name(&self.name, "menu item")?;
        require_non_negative(self.price, "price")?;
        Ok(self)
    }

    /// Document for a new item under `restaurant_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the input cannot be encoded.
    pub fn into_new_document(self, restaurant_id: &RestaurantId) -> Result<Document, StoreError> {
        let mut doc = to_document(&self)?;
        doc.insert(
            "restaurantId".to_string(),
            Value::from(restaurant_id.as_str()),
        );
        doc.entry("price".to_string()).or_insert(Value::from(0));
        doc.entry("available".to_string())
            .or_insert(Value::Bool(true));
        Ok(doc)
    }

    /// Patch document containing only the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the input cannot be encoded.
    pub fn into_patch(self) -> Result<Document, StoreError> {
        to_document(&self)
    }
}
