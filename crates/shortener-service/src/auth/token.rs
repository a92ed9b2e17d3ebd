//! HMAC JWT verification.
//!
//! # Security
//!
//! - The declared algorithm is checked against the HMAC family BEFORE any
//!   signature work, preventing algorithm-confusion attacks (an attacker
//!   supplying an unsigned or asymmetrically-"verified" token).
//! - Failure kinds are distinguished internally for logging but callers are
//!   expected to collapse them into one generic HTTP response.

use crate::auth::claims::TokenClaims;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The token declares a non-HMAC signing algorithm.
    #[error("unexpected signing method")]
    InvalidSigningMethod,

    /// The token is not structurally a JWT (bad segments, base64, or JSON).
    #[error("malformed token")]
    Malformed,

    /// Signature mismatch, expired, or not yet valid.
    #[error("invalid token")]
    Invalid,

    /// Verified payload is missing `uid`/`email` or they have the wrong type.
    #[error("malformed claims")]
    MalformedClaims,
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
}

/// Decode the unverified header and require an HMAC-family algorithm.
fn hmac_algorithm(token: &str) -> Result<Algorithm, TokenError> {
    let header_segment = token.split('.').next().unwrap_or(token);
    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;

    match header.alg.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(TokenError::InvalidSigningMethod),
    }
}

fn map_jwt_error(err: &jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => TokenError::Invalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::InvalidSigningMethod
        }
        _ => TokenError::Malformed,
    }
}

/// Verify a bearer token and extract its identity claims.
///
/// Pure verification: no I/O, no side effects. The `exp` claim is required
/// and validated with the library's default leeway.
pub fn validate(token: &str, secret: &SecretString) -> Result<TokenClaims, TokenError> {
    let algorithm = hmac_algorithm(token)?;

    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let validation = Validation::new(algorithm);

    let data =
        decode::<serde_json::Value>(token, &key, &validation).map_err(|e| map_jwt_error(&e))?;

    TokenClaims::from_value(&data.claims)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-app-secret";

    fn app_secret() -> SecretString {
        SecretString::from(SECRET)
    }

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn sign(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> serde_json::Value {
        serde_json::json!({
            "uid": 7,
            "email": "a@b.com",
            "exp": unix_now() + 3600,
        })
    }

    #[test]
    fn test_valid_token_returns_claims() {
        let token = sign(SECRET, &valid_claims());
        let claims = validate(&token, &app_secret()).unwrap();

        assert_eq!(claims.uid, 7);
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let token = sign("some-other-secret", &valid_claims());
        let result = validate(&token, &app_secret());

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        // Past the default 60s leeway.
        let exp = unix_now() - Duration::from_secs(600).as_secs();
        let token = sign(
            SECRET,
            &serde_json::json!({"uid": 7, "email": "a@b.com", "exp": exp}),
        );
        let result = validate(&token, &app_secret());

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_missing_exp_is_invalid() {
        let token = sign(SECRET, &serde_json::json!({"uid": 7, "email": "a@b.com"}));
        let result = validate(&token, &app_secret());

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_rs256_header_is_rejected_before_verification() {
        // Hand-built token declaring RS256; the signature is garbage, which
        // must not matter because the algorithm check comes first.
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&valid_claims()).unwrap());
        let token = format!("{header}.{payload}.bm90LWEtc2lnbmF0dXJl");

        let result = validate(&token, &app_secret());
        assert!(matches!(result, Err(TokenError::InvalidSigningMethod)));
    }

    #[test]
    fn test_alg_none_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&valid_claims()).unwrap());
        let token = format!("{header}.{payload}.");

        let result = validate(&token, &app_secret());
        assert!(matches!(result, Err(TokenError::InvalidSigningMethod)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = validate("garbage", &app_secret());
        assert!(matches!(result, Err(TokenError::Malformed)));
    }

    #[test]
    fn test_truncated_token_is_malformed() {
        let token = sign(SECRET, &valid_claims());
        let truncated = token.split('.').next().unwrap();

        let result = validate(truncated, &app_secret());
        assert!(matches!(result, Err(TokenError::Malformed)));
    }

    #[test]
    fn test_missing_uid_is_malformed_claims() {
        let token = sign(
            SECRET,
            &serde_json::json!({"email": "a@b.com", "exp": unix_now() + 3600}),
        );
        let result = validate(&token, &app_secret());

        assert!(matches!(result, Err(TokenError::MalformedClaims)));
    }

    #[test]
    fn test_uid_wrong_type_is_malformed_claims() {
        let token = sign(
            SECRET,
            &serde_json::json!({"uid": "7", "email": "a@b.com", "exp": unix_now() + 3600}),
        );
        let result = validate(&token, &app_secret());

        assert!(matches!(result, Err(TokenError::MalformedClaims)));
    }
}
