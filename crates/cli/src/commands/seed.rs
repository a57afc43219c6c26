//! Seed the document store from a YAML file.
//!
//! The file lists `restaurants` (each with `menuItems`), `groceryItems`,
//! `orders` and optional `settings`. Every record carries its own `id`, so
//! re-running a seed replaces documents rather than duplicating them.
//! See `crates/cli/seed/demo.yaml`.

use std::path::Path;

use tracing::info;

use quickbite_admin::db::seed::{self, SeedData};

/// Seed the admin database from a YAML file.
///
/// # Arguments
///
/// * `path` - Path to the seed file
/// * `include_settings` - Also write delivery and support settings
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a record is
/// invalid, or a database operation fails.
pub async fn from_file(
    path: &Path,
    include_settings: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    info!(path = %path.display(), "Loading seed data from file");

    // Parse before connecting so a bad file fails fast
    let content = tokio::fs::read_to_string(path).await?;
    let data: SeedData = serde_yaml::from_str(&content)?;

    info!(
        restaurants = data.restaurants.len(),
        grocery_items = data.grocery_items.len(),
        orders = data.orders.len(),
        "Parsed seed file"
    );

    let store = super::connect().await?;
    let report = seed::apply(&store, data, include_settings).await?;

    info!("Seeding complete!");
    info!("  Restaurants: {}", report.restaurants);
    info!("  Menu items: {}", report.menu_items);
    info!("  Grocery items: {}", report.grocery_items);
    info!("  Orders: {}", report.orders);
    if report.settings_written {
        info!("  Settings: written");
    }

    Ok(())
}
