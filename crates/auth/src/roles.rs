use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Back-office role carried by an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }

    /// Whether holding `self` satisfies a gate requiring `required`.
    ///
    /// Admins pass every gate; editors pass only the editor gate.
    pub fn permits(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Editor => required == Role::Editor,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("not authenticated")]
    Anonymous,

    #[error("forbidden: role '{actual}' does not grant '{required}'")]
    Forbidden { required: Role, actual: Role },
}
