//! Messages sent through the contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crocs_rwanda_core::contact::ValidContact;
use crocs_rwanda_core::{ContactMessageId, Email, MessageStatus};

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
    pub ip_address: String,
    pub user_agent: String,
    pub status: MessageStatus,
    pub admin_reply: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated message plus where it came from.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub contact: ValidContact,
    pub ip_address: String,
    pub user_agent: String,
}

/// Admin changes to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageUpdate {
    pub status: Option<MessageStatus>,
    pub admin_reply: Option<String>,
}

impl MessageUpdate {
    /// Build an update from the admin request fields.
    ///
    /// Blank replies are ignored. A reply sent without a status marks the
    /// message as replied.
    #[must_use]
    pub fn new(status: Option<MessageStatus>, admin_reply: Option<&str>) -> Self {
        let admin_reply = admin_reply
            .map(str::trim)
            .filter(|reply| !reply.is_empty())
            .map(str::to_owned);
        let status = match (status, &admin_reply) {
            (None, Some(_)) => Some(MessageStatus::Replied),
            (status, _) => status,
        };
        Self {
            status,
            admin_reply,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.admin_reply.is_none()
    }
}
