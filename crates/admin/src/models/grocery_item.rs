//! Grocery catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quickbite_core::GroceryItemId;

use super::{ValidationError, lenient, require_name, require_non_negative};
use crate::db::{Document, StoreError, to_document};

/// Category options offered by the grocery item form.
pub const GROCERY_CATEGORIES: &[&str] = &[
    "Fruits",
    "Vegetables",
    "Grains & Flours",
    "Pulses & Lentils",
    "Dairy",
    "Oils",
    "Spices",
    "Masala Powders",
    "Sweeteners",
    "Condiments",
    "Snacks",
    "Street Food",
    "Instant Foods",
    "Beverages",
    "Nuts",
    "Bakery",
    "Meat",
    "Household",
    "Other",
];

/// A grocery product sold platform-wide.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: GroceryItemId,
    pub name: String,
    pub category: String,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub price: Decimal,
    pub stock: i64,
    pub description: String,
    /// Soft-delete flag; inactive items are hidden from customers.
    pub is_active: bool,
    /// Photo URL.
    pub image: Option<String>,
    /// Emoji shown when there is no photo.
    pub unicode: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Grocery item fields accepted on create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItemInput {
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
    #[serde(
        default,
        deserialize_with = "lenient::integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<String>,
}

impl GroceryItemInput {
    /// Validate and normalize the input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is blank or price/stock negative.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = require_name(&self.name, "grocery item")?;
        require_non_negative(self.price, "price")?;
        if self.stock.is_some_and(i64::is_negative) {
            return Err(ValidationError::NegativeStock);
        }
        Ok(self)
    }

    /// Document for a new item with defaults filled in.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the input cannot be encoded.
    pub fn into_new_document(self) -> Result<Document, StoreError> {
        let mut doc = to_document(&self)?;
        doc.entry("price".to_string()).or_insert(Value::from(0));
        doc.entry("stock".to_string()).or_insert(Value::from(0));
        doc.entry("isActive".to_string())
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_document_defaults() {
        let input: GroceryItemInput = serde_json::from_value(json!({
            "name": "Basmati Rice",
            "category": "Grains & Flours",
            "price": 120.5,
            "stock": "25"
        }))
        .unwrap();

        let doc = input.validated().unwrap().into_new_document().unwrap();
        assert_eq!(doc["price"], json!(120.5));
        assert_eq!(doc["stock"], json!(25));
        assert_eq!(doc["isActive"], json!(true));
    }

    #[test]
    fn test_negative_stock_rejected() {
        let input = GroceryItemInput {
            name: "Ghee".to_string(),
            stock: Some(-1),
            ..GroceryItemInput::default()
        };
        assert_eq!(input.validated().unwrap_err(), ValidationError::NegativeStock);
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = GroceryItemInput::default();
        assert_eq!(
            input.validated().unwrap_err(),
            ValidationError::EmptyName("grocery item")
        );
    }

    #[test]
    fn test_categories_end_with_other() {
        assert_eq!(GROCERY_CATEGORIES.last(), Some(&"Other"));
        assert_eq!(GROCERY_CATEGORIES.len(), 19);
    }
}
