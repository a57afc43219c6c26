//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod stats;

use quickbite_admin::{DocumentStore, config, db};

/// Connect to the admin database configured in the environment.
async fn connect() -> Result<DocumentStore, Box<dyn std::error::Error>> {
    let database_url = config::database_url_from_env()?;
    tracing::info!("Connecting to admin database...");
    let pool = db::create_pool(&database_url).await?;
    Ok(DocumentStore::postgres(pool))
}
