//! Document counts and dashboard totals.

use tracing::info;

use quickbite_admin::db::Collection;
use quickbite_admin::services::dashboard;
use quickbite_core::CurrencyCode;

/// Show statistics about the admin database.
///
/// # Errors
///
/// Returns an error if the database connection or a query fails.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::connect().await?;

    info!("QuickBite Statistics");
    info!("====================");
    info!("Documents:");
    for collection in Collection::ALL {
        let count = store.count(collection).await?;
        info!("  {collection}: {count}");
    }

    let snapshot = dashboard::load(&store, CurrencyCode::default()).await?;
    let stats = &snapshot.stats;
    info!(
        "Orders: {} ({} food, {} grocery)",
        stats.total_orders, stats.food_orders, stats.grocery_orders
    );
    info!("Sales: {}", stats.total_sales_display);
    for month in &snapshot.sales_trend {
        info!(
            "  {} {}: {} orders, {}",
            month.name, month.year, month.orders, month.sales
        );
    }

    Ok(())
}
