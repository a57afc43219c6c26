//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Badge CSS class for an order status.
///
/// Usage in templates: `{{ order.status|status_class }}`
#[askama::filter_fn]
pub fn status_class(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(badge_class(&value.to_string()))
}

fn badge_class(status: &str) -> &'static str {
    match status {
        "pending" => "badge-warning",
        "confirmed" | "ready" => "badge-info",
        "preparing" | "packing" => "badge-secondary",
        "out-for-delivery" => "badge-primary",
        "delivered" | "completed" => "badge-success",
        "cancelled" => "badge-error",
        _ => "badge-default",
    }
}
