//! Integration tests for QuickBite.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests over the memory store
//! cargo test -p quickbite-integration-tests
//!
//! # Postgres-backed tests (needs a migrated ADMIN_DATABASE_URL)
//! cargo test -p quickbite-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Restaurant, menu and grocery CRUD
//! - `orders` - Order tables, filters and status updates
//! - `settings` - Delivery settings, zones and support details
//! - `dashboard` - Dashboard snapshot and pages
//! - `seed_file` - The demo seed file end to end
//! - `postgres_store` - Document store against a real database

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use quickbite_admin::db::seed::{self, SeedData, SeedReport};
use quickbite_admin::{AdminConfig, AppState, DocumentStore};

/// The admin router over a fresh in-memory store.
pub struct TestApp {
    pub store: DocumentStore,
    router: Router,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// App over an empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(DocumentStore::memory())
    }

    /// App over an existing store.
    #[must_use]
    pub fn with_store(store: DocumentStore) -> Self {
        let state = AppState::new(AdminConfig::in_memory(), store.clone());
        Self {
            store,
            router: quickbite_admin::router(state),
        }
    }

    /// App over a memory store loaded with the demo seed file.
    ///
    /// # Panics
    ///
    /// Panics if the seed file cannot be read or applied.
    pub async fn seeded() -> Self {
        let app = Self::new();
        seed_demo(&app.store, true).await;
        app
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        TestResponse { status, body }
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    /// Send a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send_json(&self, method: Method, uri: &str, body: &Value) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.request(request).await
    }

    /// Send a request without a body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send(&self, method: Method, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }
}

/// Path to the demo seed file shipped with the CLI.
#[must_use]
pub fn demo_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../cli/seed/demo.yaml")
}

/// Parse the demo seed file.
///
/// # Panics
///
/// Panics if the file is missing or malformed.
#[must_use]
pub fn demo_seed() -> SeedData {
    let content = std::fs::read_to_string(demo_seed_path()).expect("Failed to read demo seed");
    serde_yaml::from_str(&content).expect("Failed to parse demo seed")
}

/// Load the demo seed file into a store.
///
/// # Panics
///
/// Panics if the seed cannot be applied.
pub async fn seed_demo(store: &DocumentStore, include_settings: bool) -> SeedReport {
    seed::apply(store, demo_seed(), include_settings)
        .await
        .expect("Failed to apply demo seed")
}
