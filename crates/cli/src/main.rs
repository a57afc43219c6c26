//! QuickBite CLI - Database migrations, seeding and reporting.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! qb-cli migrate
//!
//! # Load demo restaurants, menus, grocery items and orders
//! qb-cli seed --file crates/cli/seed/demo.yaml
//!
//! # Also overwrite delivery and support settings from the seed file
//! qb-cli seed --file crates/cli/seed/demo.yaml --settings
//!
//! # Print collection counts and dashboard totals
//! qb-cli stats
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Load a YAML seed file into the document store
//! - `stats` - Show document counts and dashboard totals

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qb-cli")]
#[command(author, version, about = "QuickBite CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Load a YAML seed file into the document store
    Seed {
        /// Path to the seed file
        #[arg(short, long)]
        file: PathBuf,

        /// Also write the delivery and customer support settings
        #[arg(long)]
        settings: bool,
    },
    /// Show document counts and dashboard totals
    Stats,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Seed { file, settings } => commands::seed::from_file(&file, settings).await?,
        Commands::Stats => commands::stats::show().await?,
    }
    Ok(())
}
