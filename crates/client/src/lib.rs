//! HTTP side of the showroom: backend configuration and the `reqwest` client
//! that implements the auth and contact collaborators.

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::{ApiClient, ClientError};
