//! Admin session and overview handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::MessageResponse;
use crate::db::{OverviewCounts, overview_counts};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::{ClientIp, OptionalAdmin, RequireAdmin};
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub counts: OverviewCounts,
}

/// Log in with the shared admin password.
///
/// POST /api/admin/login
#[instrument(skip(state, session, payload), fields(client_ip = %client_ip.label()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    client_ip: ClientIp,
    payload: std::result::Result<Json<LoginForm>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(form) = payload?;

    match auth::login(&session, &state.config().admin_password_hash, &form.password).await {
        Ok(_) => {
            add_breadcrumb("auth", "Admin logged in", None);
            tracing::info!("Admin logged in");
            Ok(Json(MessageResponse::new("Logged in.")))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            Err(e.into())
        }
    }
}

/// End the admin session.
///
/// POST /api/admin/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    auth::logout(&session).await?;
    Ok(Json(MessageResponse::new("Logged out.")))
}

/// Report whether the caller holds an admin session.
///
/// GET /api/admin/session
pub async fn session_status(OptionalAdmin(admin): OptionalAdmin) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: admin.is_some(),
    })
}

/// Record counts for the console dashboard.
///
/// GET /api/admin/overview
#[instrument(skip(state))]
pub async fn overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>> {
    let counts = overview_counts(state.pool()).await?;
    Ok(Json(OverviewResponse { counts }))
}
