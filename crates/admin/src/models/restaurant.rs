//! Restaurant models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quickbite_core::RestaurantId;

use super::{ValidationError, lenient, require_name};
use crate::db::{Document, StoreError, to_document};

/// Rating given to restaurants without a usable one.
pub const DEFAULT_RATING: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
/// Emoji shown for restaurants without an image.
pub const DEFAULT_IMAGE: &str = "🍽️";
/// Status given to new restaurants.
pub const DEFAULT_STATUS: &str = "active";

/// A restaurant partner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub owner_email: String,
    pub contact: String,
    pub owner_phone: String,
    pub cuisine: String,
    /// Free-form estimate such as "30-40 min".
    pub delivery_time: String,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    pub rating: Decimal,
    /// Emoji shown in listings.
    pub image: String,
    /// Logo URL.
    pub logo: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Restaurant fields accepted on create and update.
///
/// On update, absent optional fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::serialize_decimal_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RestaurantInput {
    /// Validate and normalize the input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` if the name is blank.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = require_name(&self.name, "restaurant")?;
        Ok(self)
    }

    /// Document for a new restaurant with defaults filled in.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the input cannot be encoded.
    pub fn into_new_document(self) -> Result<Document, StoreError> {
        let mut doc = to_document(&self)?;
        let defaults = [
            ("rating", lenient::number_value(DEFAULT_RATING)),
            ("image", Value::from(DEFAULT_IMAGE)),
            ("status", Value::from(DEFAULT_STATUS)),
            ("isActive", Value::Bool(true)),
        ];
        for (key, value) in defaults {
            doc.entry(key.to_string()).or_insert(value);
        }
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
