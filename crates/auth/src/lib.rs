//! `agrofierros-auth` — admin session holder.
//!
//! Transport and persistence are collaborators: an [`AuthBackend`] issues and
//! checks bearer tokens, a [`TokenStore`] keeps the token between runs. The
//! [`SessionHolder`] is owned by the application root and shared by `Arc`.

pub mod backend;
pub mod claims;
pub mod identity;
pub mod roles;
pub mod session;
pub mod store;

pub use backend::{AuthBackend, AuthError, Credentials};
pub use claims::{ClaimsError, decode_identity};
pub use identity::Identity;
pub use roles::{AccessDenied, Role};
pub use session::{LOGIN_FAILED, MISSING_CREDENTIALS, Session, SessionHolder};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore, TokenStoreError};
