//! Authentication collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Identity;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token rejected")]
    Unauthorized,

    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Issues bearer tokens and resolves them back to identities.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError>;

    /// "Who am I" for a bearer token.
    async fn profile(&self, token: &str) -> Result<Identity, AuthError>;
}
