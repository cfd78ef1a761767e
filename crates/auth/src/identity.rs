use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Authenticated back-office user, as decoded from a token or returned by
/// the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque backend identifier.
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}
