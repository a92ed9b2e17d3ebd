//! Claims and identity types.

use crate::auth::token::TokenError;

/// Identity claims carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub uid: i64,
    pub email: String,
}

impl TokenClaims {
    /// Schema-validate a decoded claims object.
    ///
    /// `uid` must be a JSON integer fitting `i64` and `email` a string;
    /// anything else is `MalformedClaims` rather than a panic.
    pub(crate) fn from_value(claims: &serde_json::Value) -> Result<Self, TokenError> {
        let uid = claims
            .get("uid")
            .and_then(serde_json::Value::as_i64)
            .ok_or(TokenError::MalformedClaims)?;

        let email = claims
            .get("email")
            .and_then(serde_json::Value::as_str)
            .ok_or(TokenError::MalformedClaims)?;

        Ok(Self {
            uid,
            email: email.to_string(),
        })
    }
}

/// Identity attached to a request that passed the admin gate.
///
/// Inserted into the forwarded request's extensions; downstream handlers
/// read it with `Extension<AuthenticatedIdentity>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: i64,
    pub email: String,
}
