//! Document store tests against a real `PostgreSQL` database.
//!
//! These need a database with the admin migrations applied:
//!
//! ```bash
//! qb-cli migrate
//! cargo test -p quickbite-integration-tests -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::{Value, json};

use quickbite_admin::config::database_url_from_env;
use quickbite_admin::db::{self, Collection, Condition, Document, Operator, StoreError};
use quickbite_admin::DocumentStore;

async fn store() -> DocumentStore {
    let url = database_url_from_env().unwrap();
    DocumentStore::postgres(db::create_pool(&url).await.unwrap())
}

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[tokio::test]
#[ignore = "Requires a migrated ADMIN_DATABASE_URL"]
async fn test_add_get_update_delete() {
    let store = store().await;

    let id = store
        .add(
            Collection::GroceryItems,
            doc(json!({"name": "Test Paneer", "price": 90, "isActive": true})),
        )
        .await
        .unwrap();

    let stored = store
        .get(Collection::GroceryItems, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["id"], id.as_str());
    assert_eq!(stored["name"], "Test Paneer");
    assert!(stored.contains_key("createdAt"));

    store
        .update(Collection::GroceryItems, &id, doc(json!({"price": 95})))
        .await
        .unwrap();
    let stored = store
        .get(Collection::GroceryItems, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["price"], 95);
    assert_eq!(stored["name"], "Test Paneer");

    assert!(store.delete(Collection::GroceryItems, &id).await.unwrap());
    assert!(!store.delete(Collection::GroceryItems, &id).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires a migrated ADMIN_DATABASE_URL"]
async fn test_update_missing_document() {
    let store = store().await;

    let err = store
        .update(
            Collection::Restaurants,
            "definitely-not-there",
            doc(json!({"name": "Ghost"})),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "Requires a migrated ADMIN_DATABASE_URL"]
async fn test_query_by_nested_field() {
    let store = store().await;
    let marker = format!("rest_pg_{}", std::process::id());

    let id = store
        .add(
            Collection::Orders,
            doc(json!({
                "orderType": "food",
                "status": "pending",
                "restaurant": {"restaurantId": marker}
            })),
        )
        .await
        .unwrap();

    let found = store
        .query(
            Collection::Orders,
            &[Condition::new(
                "restaurant.restaurantId",
                Operator::Eq,
                marker.as_str(),
            )],
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], id.as_str());

    store.delete(Collection::Orders, &id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a migrated ADMIN_DATABASE_URL"]
async fn test_set_merge_creates_then_merges() {
    let store = store().await;
    let id = format!("pg_merge_{}", std::process::id());

    store
        .set_merge(Collection::AppSettings, &id, doc(json!({"a": 1})))
        .await
        .unwrap();
    store
        .set_merge(Collection::AppSettings, &id, doc(json!({"b": 2})))
        .await
        .unwrap();

    let stored = store
        .get(Collection::AppSettings, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["a"], 1);
    assert_eq!(stored["b"], 2);

    store.delete(Collection::AppSettings, &id).await.unwrap();
}
