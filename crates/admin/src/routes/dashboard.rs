//! Dashboard route handlers.

use askama::Template;
use axum::{Json, extract::State, response::Html};
use tracing::instrument;

use crate::{
    error::AppError,
    filters,
    services::{DashboardSnapshot, dashboard},
    state::AppState,
};

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub snapshot: DashboardSnapshot,
    /// Tallest bar in the sales chart, for scaling. Never zero.
    pub max_monthly_orders: usize,
}

impl DashboardTemplate {
    /// Bar height for a month, as a percentage of the tallest bar.
    #[must_use]
    pub const fn bar_height(&self, orders: usize) -> usize {
        orders * 100 / self.max_monthly_orders
    }
}

/// Dashboard overview page.
///
/// GET /
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = dashboard::load(state.store(), state.config().currency).await?;
    let max_monthly_orders = snapshot
        .sales_trend
        .iter()
        .map(|m| m.orders)
        .max()
        .unwrap_or(0)
        .max(1);

    let template = DashboardTemplate {
        current_path: "/".to_string(),
        snapshot,
        max_monthly_orders,
    };
    Ok(Html(template.render()?))
}

/// Dashboard snapshot as JSON.
///
/// GET /api/dashboard
#[instrument(skip(state))]
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<DashboardSnapshot>, AppError> {
    let snapshot = dashboard::load(state.store(), state.config().currency).await?;
    Ok(Json(snapshot))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use quickbite_core::CurrencyCode;
    use serde_json::json;

    use super::*;
    use crate::models::Order;

    #[test]
    fn test_sales_chart_bars_scale_to_busiest_month() {
        let orders: Vec<Order> = vec![
            serde_json::from_value(json!({"id": "food-1", "orderType": "food", "total": 10, "createdAt": "2026-03-01T10:00:00Z"})).unwrap(),
            serde_json::from_value(json!({"id": "food-2", "orderType": "food", "total": 10, "createdAt": "2026-03-02T10:00:00Z"})).unwrap(),
            serde_json::from_value(json!({"id": "groc-1", "orderType": "grocery", "total": 10, "createdAt": "2026-02-02T10:00:00Z"})).unwrap(),
        ];
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let template = DashboardTemplate {
            current_path: "/".to_string(),
            snapshot: dashboard::build(&[], orders, &[], now, CurrencyCode::INR),
            max_monthly_orders: 2,
        };

        let html = template.render().unwrap();
        assert!(html.contains("height: 100%"));
        assert!(html.contains("height: 50%"));
        assert!(html.contains("height: 0%"));
    }
}
