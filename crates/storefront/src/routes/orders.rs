//! Order route handlers.
//!
//! Shoppers place orders without an account; listing and status changes are
//! admin-only.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crocs_rwanda_core::checkout::OrderRequest;
use crocs_rwanda_core::{OrderId, OrderStatus};

use super::parse_id;
use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Order;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub message: &'static str,
    pub order_id: OrderId,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// Body of a status change.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Place an order.
///
/// POST /api/orders
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderPlacedResponse>)> {
    let Json(request) = payload?;
    let order = request.validate()?;

    let order_id = OrderRepository::new(state.pool()).create(&order).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderPlacedResponse {
            message: "Order placed successfully.",
            order_id,
        }),
    ))
}

/// List orders, newest first.
///
/// GET /api/orders
#[instrument(skip(state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<OrdersResponse>> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(OrdersResponse { orders }))
}

/// Change an order's payment status.
///
/// PATCH /api/orders/{id}/status
#[instrument(skip(state, payload))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<OrderResponse>> {
    let id: OrderId = parse_id(&id, "Order not found.")?;
    let Json(update) = payload?;
    let status: OrderStatus = update
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Status must be pending, paid, or failed.".to_string()))?;

    let order = OrderRepository::new(state.pool())
        .update_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order not found.".to_string()),
            other => other.into(),
        })?;

    Ok(Json(OrderResponse { order }))
}
