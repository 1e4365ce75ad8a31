//! Admin authentication extractors.
//!
//! Admin API handlers take [`RequireAdmin`]; requests without an admin
//! session are answered with `401 {"message": ...}` before the handler runs.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::ErrorBody;
use crate::models::CurrentAdmin;
use crate::services::auth::current_admin;

/// Extractor that requires an admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_orders(
///     RequireAdmin(_admin): RequireAdmin,
///     State(state): State<AppState>,
/// ) -> Result<Json<OrdersResponse>> {
///     ...
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection returned when no admin is logged in.
#[derive(Debug)]
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                message: "Admin login required.".to_string(),
            }),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AdminRejection)?;

        current_admin(session)
            .await
            .map(Self)
            .ok_or(AdminRejection)
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdmin`, this never rejects the request.
pub struct OptionalAdmin(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };

        Ok(Self(admin))
    }
}
