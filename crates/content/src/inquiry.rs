//! Contact inquiries sent through the public form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrofierros_core::{DomainError, DomainResult, Entity, InquiryId, ListingId};

/// Body of `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    /// Listing the inquiry was opened from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "productId")]
    pub listing_id: Option<ListingId>,
}

/// A received inquiry as shown in the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    id: InquiryId,
    #[serde(flatten)]
    pub payload: ContactPayload,
    read: bool,
    created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn received(id: InquiryId, payload: ContactPayload, at: DateTime<Utc>) -> Self {
        Self {
            id,
            payload,
            read: false,
            created_at: at,
        }
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for ContactMessage {
    type Id = InquiryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Back-office inbox of inquiries.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    messages: Vec<ContactMessage>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receive(&mut self, payload: ContactPayload, at: DateTime<Utc>) -> InquiryId {
        let id = InquiryId::new();
        tracing::info!(inquiry_id = %id, subject = %payload.subject, "inquiry received");
        self.messages.push(ContactMessage::received(id, payload, at));
        id
    }

    pub fn mark_read(&mut self, id: &InquiryId) -> DomainResult<()> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(DomainError::not_found)?;
        message.read = true;
        Ok(())
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }

    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }

    pub fn newest_first(&self) -> Vec<&ContactMessage> {
        let mut out: Vec<&ContactMessage> = self.messages.iter().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}
