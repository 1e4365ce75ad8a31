//! Integration tests for Crocs Rwanda.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate, seed and start the storefront
//! cargo run -p crocs-rwanda-cli -- migrate
//! cargo run -p crocs-rwanda-storefront
//!
//! # Run integration tests against it
//! ADMIN_PASSWORD=... cargo test -p crocs-rwanda-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - Server under test (default: <http://localhost:3000>)
//! - `ADMIN_PASSWORD` - Plain admin password matching `ADMIN_PASSWORD_HASH`
//!
//! # Test Categories
//!
//! - `storefront_api` - Public catalog, checkout, contact and stock alerts
//! - `admin_api` - Admin session, product management and record status changes

#![allow(clippy::expect_used)]

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Full URL for a path on the server under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// Client with a cookie jar, so an admin session survives between requests.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Client logged in as admin.
///
/// # Panics
///
/// Panics if `ADMIN_PASSWORD` is unset or the login is refused.
pub async fn admin_client() -> Client {
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set");
    let client = client();
    let resp = client
        .post(url("/api/admin/login"))
        .json(&json!({ "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert!(resp.status().is_success(), "login refused: {}", resp.status());
    client
}

/// A unique email so reruns do not collide with stored records.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Body of a one-item card order for `product`.
#[must_use]
pub fn order_body(product_id: &str, email: &str) -> Value {
    json!({
        "customer": {
            "fullName": "Integration Shopper",
            "email": email,
            "phone": "+250788000000"
        },
        "payment": { "method": "card", "cardNumber": "4242 4242 4242 4242" },
        "items": [{
            "productId": product_id,
            "name": "Integration Clog",
            "price": "30.00",
            "quantity": 2,
            "image": ""
        }],
        "summary": { "subtotal": "60.00", "shipping": "5.00", "total": "65.00" }
    })
}
