//! Token payload decoding.
//!
//! Only the payload is read. The signature is the backend's business; the
//! token is re-validated through the profile endpoint on refresh.

use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::identity::Identity;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token has no readable `user` claim: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Deserialize)]
struct Claims {
    user: Identity,
}

fn payload_only() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Read the identity embedded in the token's `user` claim.
pub fn decode_identity(token: &str) -> Result<Identity, ClaimsError> {
    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &payload_only())?;
    Ok(data.claims.user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use jsonwebtoken::errors::ErrorKind;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"issued-by-backend"),
        )
        .expect("failed to encode jwt")
    }

    fn kind(err: ClaimsError) -> ErrorKind {
        match err {
            ClaimsError::Invalid(err) => err.into_kind(),
        }
    }

    #[test]
    fn reads_user_claim_without_the_signing_key() {
        let token = mint(json!({
            "user": {"id": "u-1", "username": "marta", "email": "marta@agrofierros.uy", "role": "editor"},
        }));
        let identity = decode_identity(&token).unwrap();
        assert_eq!(identity.username, "marta");
        assert_eq!(identity.role, Role::Editor);
    }

    #[test]
    fn expired_tokens_still_decode() {
        let token = mint(json!({
            "user": {"id": "u-2", "username": "ed", "email": "ed@agrofierros.uy", "role": "admin"},
            "exp": 1u64,
        }));
        assert_eq!(decode_identity(&token).unwrap().role, Role::Admin);
    }

    #[test]
    fn rejects_tokens_without_user_claim() {
        let token = mint(json!({"sub": "u-1"}));
        let err = decode_identity(&token).unwrap_err();
        assert!(matches!(kind(err), ErrorKind::Json(_)));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_identity("abc").is_err());
        assert!(decode_identity("a..c").is_err());
        assert!(decode_identity("not-a-jwt").is_err());
    }
}
