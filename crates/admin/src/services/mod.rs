//! Business logic services for admin.
//!
//! # Services
//!
//! - `dashboard` - Dashboard statistics, order-type shares and sales trend
//! - `delivery` - Delivery zone lookup, delivery terms and overlap report

pub mod dashboard;
pub mod delivery;

pub use dashboard::{DashboardSnapshot, DashboardStats, MonthlySales, OrderTypeShare, RecentOrder};
pub use delivery::{
    DeliveryTerms, ZoneOverlap, delivery_terms, find_zone, format_support_phone, zone_overlaps,
};
