//! Status enums for orders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Kind of order stored in the unified `orders` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Food,
    Grocery,
}

impl OrderType {
    /// Value stored in the `orderType` field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Grocery => "grocery",
        }
    }

    /// Human-readable label, e.g. "Food Order".
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food Order",
            Self::Grocery => "Grocery Order",
        }
    }

    /// Statuses an order of this type may be moved to.
    #[must_use]
    pub const fn allowed_statuses(&self) -> &'static [OrderStatus] {
        match self {
            Self::Food => &[
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::OutForDelivery,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ],
            Self::Grocery => &[
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Packing,
                OrderStatus::Ready,
                OrderStatus::OutForDelivery,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ],
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "grocery" => Ok(Self::Grocery),
            _ => Err(format!("unknown order type: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// Stored as kebab-case strings (`out-for-delivery`). Documents written by
/// other clients may carry values outside this set; those are kept as raw
/// strings on the order and rendered verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Packing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
    Completed,
}

impl OrderStatus {
    /// Every known status, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Packing,
        Self::Ready,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Stored value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Packing => "packing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out-for-delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Packing => "Packing",
            Self::Ready => "Ready",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }

    /// Label for a raw stored status. Unknown values are returned unchanged.
    #[must_use]
    pub fn label_for(raw: &str) -> String {
        raw.parse::<Self>()
            .map_or_else(|_| raw.to_owned(), |s| s.label().to_owned())
    }

    /// Whether an order of `order_type` may carry this status.
    #[must_use]
    pub fn is_allowed_for(&self, order_type: OrderType) -> bool {
        order_type.allowed_statuses().contains(self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(OrderStatus::OutForDelivery.label(), "Out for Delivery");
        assert_eq!(OrderStatus::label_for("preparing"), "Preparing");
        assert_eq!(OrderStatus::label_for("on-hold"), "on-hold");
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out-for-delivery\"");
        let parsed: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_from_str_round_trips_every_status() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("Pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_packing_only_for_grocery() {
        assert!(OrderStatus::Packing.is_allowed_for(OrderType::Grocery));
        assert!(!OrderStatus::Packing.is_allowed_for(OrderType::Food));
        assert!(OrderStatus::Ready.is_allowed_for(OrderType::Food));
        assert!(!OrderStatus::Completed.is_allowed_for(OrderType::Food));
    }

    #[test]
    fn test_order_type_parse_and_label() {
        assert_eq!(" Food ".parse::<OrderType>(), Ok(OrderType::Food));
        assert_eq!(OrderType::Grocery.label(), "Grocery Order");
        assert!("drinks".parse::<OrderType>().is_err());
    }
}
