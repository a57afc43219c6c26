//! QuickBite Admin library.
//!
//! This crate provides the admin dashboard as a library,
//! allowing it to be tested and reused.
//!
//! # Layout
//!
//! - [`db`] - Document store (Postgres or in-memory) and repositories
//! - [`models`] - Normalized documents and API inputs
//! - [`services`] - Dashboard aggregation and delivery zone logic
//! - [`routes`] - HTML pages and the JSON API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;

pub use config::AdminConfig;
pub use db::DocumentStore;
pub use state::AppState;

/// Build the application router with state applied.
///
/// Tracing, Sentry and static file layers are added by the binary.
pub fn router(state: AppState) -> Router {
    routes::routes().with_state(state)
}
