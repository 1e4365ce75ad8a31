//! Integration tests for the admin API.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated with `crocs-cli migrate`
//! - The storefront running (cargo run -p crocs-rwanda-storefront)
//! - `ADMIN_PASSWORD` set to the password behind `ADMIN_PASSWORD_HASH`
//!
//! Run with: cargo test -p crocs-rwanda-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crocs_rwanda_integration_tests::{admin_client, client, order_body, unique_email, url};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_session_lifecycle() {
    let anonymous = client();
    let body: Value = anonymous
        .get(url("/api/admin/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"authenticated": false}));

    let admin = admin_client().await;
    let body: Value = admin
        .get(url("/api/admin/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"authenticated": true}));

    let resp = admin.post(url("/api/admin/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin.get(url("/api/orders")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_password() {
    let resp = client()
        .post(url("/api/admin/login"))
        .json(&json!({"password": "definitely-not-it"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid password.");
}

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_overview_counts() {
    let admin = admin_client().await;
    let body: Value = admin
        .get(url("/api/admin/overview"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for key in ["products", "orders", "messages", "openAlerts"] {
        assert!(body["counts"][key].is_i64(), "{key}");
    }
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_product_crud() {
    let admin = admin_client().await;

    let resp = admin
        .post(url("/api/products"))
        .json(&json!({
            "name": "Integration Clog",
            "price": 30,
            "stock": 4,
            "colors": "Lime, Black",
            "sizes": ["M8", "M9"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    let product = &created["product"];
    let id = product["id"].as_str().unwrap().to_owned();
    assert_eq!(product["category"], "General");
    assert_eq!(product["colors"], json!(["Lime", "Black"]));

    // Visible to the public list straight away
    let list: Value = client()
        .get(url("/api/products?q=integration clog"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        list["products"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["id"] == id.as_str())
    );

    let resp = admin
        .put(url(&format!("/api/products/{id}")))
        .json(&json!({"name": "Integration Clog II", "price": 35, "stock": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["product"]["name"], "Integration Clog II");

    let resp = admin
        .delete(url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .delete(url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_product_validation() {
    let admin = admin_client().await;
    let resp = admin
        .post(url("/api/products"))
        .json(&json!({"name": "  ", "price": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Orders, messages, alerts
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_order_status_change() {
    let placed: Value = client()
        .post(url("/api/orders"))
        .json(&order_body("1", &unique_email("status")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order_id = placed["orderId"].as_i64().unwrap();

    let admin = admin_client().await;
    let orders: Value = admin
        .get(url("/api/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order = orders["orders"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["id"] == order_id)
        .expect("placed order is listed");
    assert_eq!(order["status"], "pending");

    let resp = admin
        .patch(url(&format!("/api/orders/{order_id}/status")))
        .json(&json!({"status": "paid"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"]["status"], "paid");

    let resp = admin
        .patch(url(&format!("/api/orders/{order_id}/status")))
        .json(&json!({"status": "shipped"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_reply_marks_message_replied() {
    let admin = admin_client().await;
    let messages: Value = admin
        .get(url("/api/contact-messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let Some(message) = messages["messages"].as_array().unwrap().first() else {
        return;
    };
    let id = message["id"].as_i64().unwrap();

    let resp = admin
        .patch(url(&format!("/api/contact-messages/{id}")))
        .json(&json!({"adminReply": "Yes, they run true to size."}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["contactMessage"]["status"], "replied");
}

#[tokio::test]
#[ignore = "Requires running storefront server and ADMIN_PASSWORD"]
async fn test_alert_resolve_and_reopen() {
    let created: Value = client()
        .post(url("/api/stock-alerts"))
        .json(&json!({
            "productId": "1",
            "productName": "Classic Clog",
            "email": unique_email("alert")
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["alertId"].as_i64().unwrap();

    let admin = admin_client().await;
    for status in ["resolved", "open"] {
        let resp = admin
            .patch(url(&format!("/api/stock-alerts/{id}")))
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["alert"]["status"], status);
    }
}
