//! Integration tests for delivery settings, zones and customer support.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use quickbite_integration_tests::TestApp;

#[tokio::test]
async fn test_defaults_without_stored_settings() {
    let app = TestApp::new();

    let resp = app.get("/api/settings/delivery").await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["deliveryFeeFood"], 30);
    assert_eq!(body["deliveryFeeGrocery"], 20);
    assert_eq!(body["foodMinOrderValue"], 50);
    assert_eq!(body["groceryMinOrderValue"], 100);
    assert_eq!(body["taxPercentage"], 5);
    assert_eq!(body["isFoodMinOrderEnabled"], true);

    let zones = body["deliveryZones"].as_array().unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0]["id"], "zone_1");
    assert_eq!(zones[0]["name"], "City Center");
    assert_eq!(zones[1]["zipCodes"], json!(["10004", "10005", "10006"]));
}

#[tokio::test]
async fn test_update_delivery_overlays_fields() {
    let app = TestApp::new();

    let resp = app
        .send_json(
            Method::PUT,
            "/api/settings/delivery",
            &json!({"deliveryFeeFood": "45", "isFoodMinOrderEnabled": false}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let body = app.get("/api/settings/delivery").await.json();
    assert_eq!(body["deliveryFeeFood"], 45);
    assert_eq!(body["deliveryFeeGrocery"], 20);
    assert_eq!(body["isFoodMinOrderEnabled"], false);
    assert_eq!(body["deliveryZones"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_zone_lookup_matches_zone() {
    let app = TestApp::seeded().await;

    let resp = app
        .get("/api/settings/zones/lookup?zip=10004&orderType=grocery")
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["zoneId"], "zone_2");
    assert_eq!(body["zoneName"], "Metro Area");
    assert_eq!(body["orderType"], "grocery");
    assert_eq!(body["deliveryFee"], 30);
    assert_eq!(body["minOrder"], 150);
    assert_eq!(body["deliveryTime"], "25-35 min");
}

#[tokio::test]
async fn test_zone_lookup_falls_back_to_global_terms() {
    let app = TestApp::seeded().await;

    let body = app.get("/api/settings/zones/lookup?zip=99999").await.json();

    assert_eq!(body["zoneId"], Value::Null);
    assert_eq!(body["orderType"], "food");
    assert_eq!(body["deliveryFee"], 30);
    assert_eq!(body["minOrder"], 50);
    assert_eq!(body["deliveryTime"], Value::Null);
}

#[tokio::test]
async fn test_zone_lookup_omits_disabled_minimum() {
    let app = TestApp::new();
    app.send_json(
        Method::PUT,
        "/api/settings/delivery",
        &json!({"isFoodMinOrderEnabled": false}),
    )
    .await;

    let body = app.get("/api/settings/zones/lookup?zip=10001").await.json();

    assert_eq!(body["zoneId"], "zone_1");
    assert_eq!(body["minOrder"], Value::Null);
}

#[tokio::test]
async fn test_zone_lookup_rejects_bad_input() {
    let app = TestApp::new();

    assert_eq!(
        app.get("/api/settings/zones/lookup?zip=").await.status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        app.get("/api/settings/zones/lookup?zip=10001&orderType=pharmacy")
            .await
            .status,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_zone_crud() {
    let app = TestApp::new();

    let resp = app
        .send_json(
            Method::POST,
            "/api/settings/zones",
            &json!({
                "name": "Whitefield",
                "zipCodes": "560066, 560067",
                "deliveryFeeFood": 35,
                "minOrderFood": "60",
                "deliveryTime": "30-40 min"
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let zone = resp.json();
    assert_eq!(zone["zipCodes"], json!(["560066", "560067"]));
    assert_eq!(zone["isActive"], true);
    assert_eq!(zone["deliveryFeeGrocery"], 0);
    let id = zone["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("zone_"));

    let zones = app.get("/api/settings/delivery").await.json()["deliveryZones"].clone();
    assert_eq!(zones.as_array().unwrap().len(), 3);
    assert_eq!(zones[2]["id"], id.as_str());

    let resp = app
        .send_json(
            Method::PUT,
            &format!("/api/settings/zones/{id}"),
            &json!({"name": "Whitefield East", "zipCodes": ["560066"], "deliveryFeeFood": 40}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "Whitefield East");

    let body = app
        .get("/api/settings/zones/lookup?zip=560066")
        .await
        .json();
    assert_eq!(body["deliveryFee"], 40);

    let resp = app
        .send(Method::DELETE, &format!("/api/settings/zones/{id}"))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app
        .send(Method::DELETE, &format!("/api/settings/zones/{id}"))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zone_validation() {
    let app = TestApp::new();

    let resp = app
        .send_json(
            Method::POST,
            "/api/settings/zones",
            &json!({"name": "Nowhere", "zipCodes": ""}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["error"],
        "a delivery zone needs at least one zip code"
    );

    let resp = app
        .send_json(
            Method::POST,
            "/api/settings/zones",
            &json!({"name": " ", "zipCodes": "10009"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "zone name cannot be empty");

    let resp = app
        .send_json(
            Method::PUT,
            "/api/settings/zones/zone_missing",
            &json!({"name": "Ghost", "zipCodes": "10009"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inactive_zone_is_skipped_by_lookup() {
    let app = TestApp::new();

    let resp = app
        .send(Method::POST, "/api/settings/zones/zone_1/toggle-active")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["isActive"], false);

    let body = app
        .get("/api/settings/zones/lookup?zip=10001&orderType=grocery")
        .await
        .json();
    assert_eq!(body["zoneId"], Value::Null);
    assert_eq!(body["deliveryFee"], 20);
    assert_eq!(body["minOrder"], 100);
}

#[tokio::test]
async fn test_overlapping_zones_first_wins() {
    let app = TestApp::new();

    assert!(
        app.get("/api/settings/zones/overlaps")
            .await
            .json()
            .as_array()
            .unwrap()
            .is_empty()
    );

    app.send_json(
        Method::POST,
        "/api/settings/zones",
        &json!({"name": "Downtown Express", "zipCodes": "10001", "deliveryFeeFood": 10}),
    )
    .await;

    let overlaps = app.get("/api/settings/zones/overlaps").await.json();
    let overlaps = overlaps.as_array().unwrap();
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0]["zip"], "10001");
    assert_eq!(overlaps[0]["zoneIds"][0], "zone_1");

    let body = app.get("/api/settings/zones/lookup?zip=10001").await.json();
    assert_eq!(body["zoneId"], "zone_1");
    assert_eq!(body["deliveryFee"], 30);
}

#[tokio::test]
async fn test_customer_support() {
    let app = TestApp::new();

    let body = app.get("/api/settings/support").await.json();
    assert_eq!(body["phone"], "+91-9876543210");
    assert_eq!(body["phoneDisplay"], "91-9876-543210");
    assert_eq!(body["emergencySupport"], true);

    let resp = app
        .send_json(
            Method::PUT,
            "/api/settings/support",
            &json!({"whatsapp": "+91 80 4567 8901", "isActive": false}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let body = app.get("/api/settings/support").await.json();
    assert_eq!(body["whatsappDisplay"], "91-8045-678901");
    assert_eq!(body["isActive"], false);
    assert_eq!(body["email"], "support@quickbite.com");
}
