//! `reqwest` implementation of the backend collaborators.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use agrofierros_auth::{AuthBackend, AuthError, Credentials, Identity};
use agrofierros_content::ContactPayload;
use agrofierros_forms::{ContactSubmitter, SubmitError};

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Client for the showroom backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

async fn body_text(resp: reqwest::Response) -> String {
    resp.text().await.unwrap_or_default()
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let url = self.config.endpoint("auth/login");
        debug!(%url, "POST login");
        let resp = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => {
                let body: LoginResponse = resp
                    .json()
                    .await
                    .map_err(|e| AuthError::Decode(e.to_string()))?;
                Ok(body.access_token)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidCredentials),
            s => Err(AuthError::Server {
                status: s.as_u16(),
                message: body_text(resp).await,
            }),
        }
    }

    async fn profile(&self, token: &str) -> Result<Identity, AuthError> {
        let url = self.config.endpoint("auth/profile");
        debug!(%url, "GET profile");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => resp
                .json()
                .await
                .map_err(|e| AuthError::Decode(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::Unauthorized),
            s => Err(AuthError::Server {
                status: s.as_u16(),
                message: body_text(resp).await,
            }),
        }
    }
}

#[async_trait]
impl ContactSubmitter for ApiClient {
    async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError> {
        let url = self.config.endpoint("contact");
        debug!(%url, "POST contact");
        let resp = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(SubmitError::Rejected {
                status: resp.status().as_u16(),
                message: body_text(resp).await,
            })
        }
    }
}
