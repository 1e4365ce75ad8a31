//! Contact form and admin inbox handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crocs_rwanda_core::contact::ContactForm;
use crocs_rwanda_core::{ContactMessageId, MessageStatus};

use super::{MessageResponse, parse_id};
use crate::db::{ContactMessageRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{ClientIp, RequireAdmin};
use crate::models::{ContactMessage, MessageUpdate, NewContactMessage};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ContactMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponse {
    pub contact_message: ContactMessage,
}

/// Admin changes to a message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    pub status: Option<String>,
    pub admin_reply: Option<String>,
}

/// Receive a contact form submission.
///
/// POST /api/contact
///
/// The sender is throttled before the body is validated, so rejected
/// submissions still count towards the cooldown.
#[instrument(skip(state, headers, payload), fields(client_ip = %client_ip.label()))]
pub async fn submit(
    State(state): State<AppState>,
    client_ip: ClientIp,
    headers: HeaderMap,
    payload: std::result::Result<Json<ContactForm>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let sender = client_ip.label();
    let decision = state.contact_throttle().check(&sender, Utc::now());
    if let Some(message) = decision.message() {
        tracing::warn!(?decision, "Contact submission throttled");
        return Err(AppError::RateLimited(message.to_string()));
    }

    let Json(form) = payload?;
    let contact = form
        .into_valid()
        .map_err(|message| AppError::BadRequest(message.to_string()))?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let id = ContactMessageRepository::new(state.pool())
        .create(&NewContactMessage {
            contact,
            ip_address: sender,
            user_agent,
        })
        .await?;
    tracing::info!(message_id = %id, "Contact message stored");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Message received.")),
    ))
}

/// List contact messages, newest first.
///
/// GET /api/contact-messages
#[instrument(skip(state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<MessagesResponse>> {
    let messages = ContactMessageRepository::new(state.pool()).list().await?;
    Ok(Json(MessagesResponse { messages }))
}

/// Mark a message read or store a reply.
///
/// PATCH /api/contact-messages/{id}
#[instrument(skip(state, payload))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<MessagePatch>, JsonRejection>,
) -> Result<Json<ContactMessageResponse>> {
    let id: ContactMessageId = parse_id(&id, "Message not found.")?;
    let Json(patch) = payload?;

    let status = patch
        .status
        .as_deref()
        .map(str::parse::<MessageStatus>)
        .transpose()
        .map_err(|_| AppError::BadRequest("Status must be new, read, or replied.".to_string()))?;
    let update = MessageUpdate::new(status, patch.admin_reply.as_deref());
    if update.is_empty() {
        return Err(AppError::BadRequest(
            "Nothing to update: send a status or a reply.".to_string(),
        ));
    }

    let contact_message = ContactMessageRepository::new(state.pool())
        .update(id, &update)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Message not found.".to_string()),
            other => other.into(),
        })?;

    Ok(Json(ContactMessageResponse { contact_message }))
}
