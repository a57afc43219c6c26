//! Domain models for the admin dashboard.
//!
//! Models are the normalized view of stored documents: defaults applied,
//! lenient fields resolved. Each `*Input` type is what the API accepts for
//! create and update, and converts into a document patch.

pub mod grocery_item;
pub mod lenient;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod settings;

use thiserror::Error;

use quickbite_core::{OrderType, ZipCodeError};

pub use grocery_item::{GROCERY_CATEGORIES, GroceryItem, GroceryItemInput};
pub use menu_item::{MENU_CATEGORIES, MenuItem, MenuItemInput};
pub use order::{
    DeliveryAddress, Order, OrderFilter, OrderItem, OrderRestaurant, OrderSummary, Pricing,
};
pub use restaurant::{Restaurant, RestaurantInput};
pub use settings::{
    CustomerSupport, CustomerSupportDoc, DeliverySettings, DeliverySettingsDoc, DeliveryZone,
    ZoneDraft,
};

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required name is blank.
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    /// A monetary amount is below zero.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Stock is below zero.
    #[error("stock cannot be negative")]
    NegativeStock,

    /// A zone was given no ZIP codes.
    #[error("a delivery zone needs at least one zip code")]
    NoZipCodes,

    /// A ZIP code failed to parse.
    #[error("invalid zip code {zip:?}: {source}")]
    InvalidZip {
        /// The rejected input.
        zip: String,
        /// Why it was rejected.
        source: ZipCodeError,
    },

    /// The status string is not a known order status.
    #[error("unknown order status '{0}'")]
    UnknownStatus(String),

    /// The status is known but not valid for this kind of order.
    #[error("status '{status}' is not allowed for {order_type} orders")]
    StatusNotAllowed {
        /// Requested status.
        status: String,
        /// Type of the order being updated.
        order_type: OrderType,
    },
}

/// Trim a required name, rejecting blanks.
pub(crate) fn require_name(name: &str, what: &'static str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName(what));
    }
    Ok(trimmed.to_string())
}

/// Reject negative amounts; `None` passes.
pub(crate) fn require_non_negative(
    amount: Option<rust_decimal::Decimal>,
    what: &'static str,
) -> Result<(), ValidationError> {
    match amount {
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            Err(ValidationError::NegativeAmount(what))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_require_name_trims() {
        assert_eq!(require_name("  Dosa Hut ", "restaurant"), Ok("Dosa Hut".to_string()));
        assert_eq!(
            require_name("   ", "restaurant"),
            Err(ValidationError::EmptyName("restaurant"))
        );
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative(None, "price").is_ok());
        assert!(require_non_negative(Some(Decimal::ZERO), "price").is_ok());
        assert_eq!(
            require_non_negative(Some(Decimal::new(-1, 0)), "price"),
            Err(ValidationError::NegativeAmount("price"))
        );
    }

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::StatusNotAllowed {
            status: "packing".to_string(),
            order_type: OrderType::Food,
        };
        assert_eq!(err.to_string(), "status 'packing' is not allowed for food orders");
    }
}
