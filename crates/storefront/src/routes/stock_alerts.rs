//! Back-in-stock alert handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crocs_rwanda_core::catalog::ProductRef;
use crocs_rwanda_core::{AlertStatus, Email, StockAlertId};

use super::parse_id;
use crate::db::{AlertOutcome, RepositoryError, StockAlertRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewStockAlert, StockAlert};
use crate::state::AppState;

/// Alert request as posted from a product page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertRequest {
    pub product_id: String,
    pub product_name: String,
    pub email: String,
}

impl AlertRequest {
    fn validate(self) -> std::result::Result<NewStockAlert, AppError> {
        let product_id = ProductRef::new(&self.product_id);
        if product_id.is_empty() {
            return Err(AppError::BadRequest("Product is required.".to_string()));
        }
        let product_name = self.product_name.trim().to_owned();
        if product_name.is_empty() {
            return Err(AppError::BadRequest("Product name is required.".to_string()));
        }
        let email = Email::parse(&self.email).map_err(|_| {
            AppError::BadRequest("Please enter a valid email address.".to_string())
        })?;

        Ok(NewStockAlert {
            product_id,
            product_name,
            email,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCreatedResponse {
    pub message: &'static str,
    pub alert_id: StockAlertId,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<StockAlert>,
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub alert: StockAlert,
}

#[derive(Debug, Deserialize)]
pub struct AlertStatusUpdate {
    pub status: String,
}

/// Ask to be notified when a product is back in stock.
///
/// POST /api/stock-alerts
///
/// Repeating a request for the same product and email returns the open
/// alert instead of storing a second one.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AlertRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AlertCreatedResponse>)> {
    let Json(request) = payload?;
    let alert = request.validate()?;

    let outcome = StockAlertRepository::new(state.pool())
        .create_or_existing(&alert)
        .await?;

    let response = match outcome {
        AlertOutcome::Created(alert) => (
            StatusCode::CREATED,
            Json(AlertCreatedResponse {
                message: "We'll email you when it's back in stock.",
                alert_id: alert.id,
            }),
        ),
        AlertOutcome::Existing(alert) => (
            StatusCode::OK,
            Json(AlertCreatedResponse {
                message: "You're already on the list for this product.",
                alert_id: alert.id,
            }),
        ),
    };
    Ok(response)
}

/// List alerts, newest first.
///
/// GET /api/stock-alerts
#[instrument(skip(state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AlertsResponse>> {
    let alerts = StockAlertRepository::new(state.pool()).list().await?;
    Ok(Json(AlertsResponse { alerts }))
}

/// Open or resolve an alert.
///
/// PATCH /api/stock-alerts/{id}
#[instrument(skip(state, payload))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<AlertStatusUpdate>, JsonRejection>,
) -> Result<Json<AlertResponse>> {
    let id: StockAlertId = parse_id(&id, "Alert not found.")?;
    let Json(update) = payload?;
    let status: AlertStatus = update
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Status must be open or resolved.".to_string()))?;

    let alert = StockAlertRepository::new(state.pool())
        .update_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Alert not found.".to_string()),
            other => other.into(),
        })?;

    Ok(Json(AlertResponse { alert }))
}
