//! Database operations for contact form messages.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crocs_rwanda_core::{ContactMessageId, Email, MessageStatus};

use super::RepositoryError;
use crate::models::{ContactMessage, MessageUpdate, NewContactMessage};

/// Internal row type for contact message queries.
#[derive(Debug, sqlx::FromRow)]
struct ContactMessageRow {
    id: i32,
    name: String,
    email: String,
    subject: String,
    message: String,
    ip_address: String,
    user_agent: String,
    status: MessageStatus,
    admin_reply: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactMessageRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: ContactMessageRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("contact message {} email: {e}", row.id))
        })?;

        Ok(Self {
            id: ContactMessageId::new(row.id),
            name: row.name,
            email,
            subject: row.subject,
            message: row.message,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            status: row.status,
            admin_reply: row.admin_reply,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const MESSAGE_COLUMNS: &str = "id, name, email, subject, message, ip_address, user_agent, \
                               status, admin_reply, created_at, updated_at";

/// Repository for contact message database operations.
pub struct ContactMessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactMessageRepository<'a> {
    /// Create a new contact message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new message with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, new), fields(email = %new.contact.email))]
    pub async fn create(&self, new: &NewContactMessage) -> Result<ContactMessageId, RepositoryError> {
        let row: (i32,) = sqlx::query_as(
            r"
            INSERT INTO storefront.contact_message
                (name, email, subject, message, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&new.contact.name)
        .bind(new.contact.email.as_str())
        .bind(&new.contact.subject)
        .bind(&new.contact.message)
        .bind(&new.ip_address)
        .bind(&new.user_agent)
        .fetch_one(self.pool)
        .await?;

        Ok(ContactMessageId::new(row.0))
    }

    /// List all messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows: Vec<ContactMessageRow> = sqlx::query_as(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM storefront.contact_message \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ContactMessage::try_from).collect()
    }

    /// Apply an admin update. Fields left as `None` keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    #[instrument(skip(self, update), fields(message_id = %id))]
    pub async fn update(
        &self,
        id: ContactMessageId,
        update: &MessageUpdate,
    ) -> Result<ContactMessage, RepositoryError> {
        let row: Option<ContactMessageRow> = sqlx::query_as(&format!(
            r"
            UPDATE storefront.contact_message
            SET status = COALESCE($2, status),
                admin_reply = COALESCE($3, admin_reply)
            WHERE id = $1
            RETURNING {MESSAGE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.status)
        .bind(update.admin_reply.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
