//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/products                - Product listing (category, price, color, size, q)
//! GET    /api/products/{id}           - Product detail
//! POST   /api/products                - Create product (admin)
//! PUT    /api/products/{id}           - Update product (admin)
//! DELETE /api/products/{id}           - Delete product (admin)
//!
//! # Orders
//! POST   /api/orders                  - Place an order
//! GET    /api/orders                  - List orders (admin)
//! PATCH  /api/orders/{id}/status      - Change payment status (admin)
//!
//! # Contact
//! POST   /api/contact                 - Contact form (throttled per client IP)
//! GET    /api/contact-messages        - List messages (admin)
//! PATCH  /api/contact-messages/{id}   - Mark read / reply (admin)
//!
//! # Stock alerts
//! POST   /api/stock-alerts            - Request a back-in-stock email
//! GET    /api/stock-alerts            - List alerts (admin)
//! PATCH  /api/stock-alerts/{id}       - Open / resolve (admin)
//!
//! # Admin session
//! POST   /api/admin/login             - Log in (rate limited)
//! POST   /api/admin/logout            - Log out
//! GET    /api/admin/session           - Whether a session is active
//! GET    /api/admin/overview          - Record counts (admin)
//! ```

pub mod admin;
pub mod contact;
pub mod orders;
pub mod products;
pub mod stock_alerts;

use std::str::FromStr;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Serialize;

use crate::error::{AppError, ErrorBody, Result};
use crate::middleware::login_rate_limiter;
use crate::state::AppState;

/// `{"message": ...}` body for actions without a record to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Parse a path id; anything unparseable cannot name a record.
pub(crate) fn parse_id<T: FromStr>(raw: &str, not_found: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(not_found.to_owned()))
}

/// Catch-all for unknown `/api` paths.
async fn api_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            message: "Not found".to_string(),
        }),
    )
}

/// Create the product routes router.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the admin session routes router.
///
/// Only the login route sits behind the rate limiter.
fn admin_routes(trust_proxy: bool) -> Router<AppState> {
    let login = Router::new()
        .route("/login", post(admin::login))
        .layer(login_rate_limiter(trust_proxy));

    Router::new()
        .route("/logout", post(admin::logout))
        .route("/session", get(admin::session_status))
        .route("/overview", get(admin::overview))
        .merge(login)
}

/// Create all `/api` routes.
///
/// `trust_proxy` decides whether the login limiter keys on proxy headers.
pub fn routes(trust_proxy: bool) -> Router<AppState> {
    let api = Router::new()
        .nest("/products", product_routes())
        .route("/orders", post(orders::create).get(orders::index))
        .route("/orders/{id}/status", patch(orders::update_status))
        .route("/contact", post(contact::submit))
        .route("/contact-messages", get(contact::index))
        .route("/contact-messages/{id}", patch(contact::update))
        .route(
            "/stock-alerts",
            post(stock_alerts::create).get(stock_alerts::index),
        )
        .route("/stock-alerts/{id}", patch(stock_alerts::update_status))
        .nest("/admin", admin_routes(trust_proxy))
        .fallback(api_not_found);

    Router::new().nest("/api", api)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crocs_rwanda_core::{OrderId, ProductId};

    #[test]
    fn test_parse_id() {
        let id: ProductId = parse_id(" 42 ", "Product not found.").unwrap();
        assert_eq!(id, ProductId::new(42));

        let err = parse_id::<OrderId>("abc", "Order not found.").unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Order not found."));
    }

    #[test]
    fn test_message_response_shape() {
        let json = serde_json::to_value(MessageResponse::new("Product deleted.")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Product deleted."}));
    }
}
