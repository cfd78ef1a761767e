//! Collaborator that delivers contact inquiries.

use async_trait::async_trait;
use thiserror::Error;

use agrofierros_content::ContactPayload;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected the inquiry ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Sends a contact payload to the backend.
#[async_trait]
pub trait ContactSubmitter: Send + Sync {
    async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError>;
}
