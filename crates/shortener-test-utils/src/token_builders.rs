//! Builder patterns for test token construction
//!
//! Provides a fluent API for creating signed JWTs in tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::TEST_APP_SECRET;

/// Builder for creating signed test JWTs
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .with_uid(42)
///     .with_email("alice@example.com")
///     .expires_in(3600)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    uid: Option<serde_json::Value>,
    email: Option<serde_json::Value>,
    exp: Option<i64>,
    secret: String,
    algorithm: Algorithm,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        Self {
            uid: Some(json!(1)),
            email: Some(json!("user@example.com")),
            exp: Some((Utc::now() + Duration::seconds(3600)).timestamp()),
            secret: TEST_APP_SECRET.to_string(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Set the user id claim
    pub fn with_uid(mut self, uid: i64) -> Self {
        self.uid = Some(json!(uid));
        self
    }

    /// Set the user id claim to an arbitrary JSON value (for malformed-claims tests)
    pub fn with_raw_uid(mut self, uid: serde_json::Value) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Remove the user id claim entirely
    pub fn without_uid(mut self) -> Self {
        self.uid = None;
        self
    }

    /// Set the email claim
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(json!(email));
        self
    }

    /// Remove the email claim entirely
    pub fn without_email(mut self) -> Self {
        self.email = None;
        self
    }

    /// Set expiration in seconds from now (negative for already-expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Remove the exp claim entirely
    pub fn without_exp(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Sign with a different secret (for wrong-key tests)
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Sign with a different HMAC algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims as a JSON value without signing
    pub fn build_claims(&self) -> serde_json::Value {
        let mut claims = serde_json::Map::new();
        if let Some(uid) = &self.uid {
            claims.insert("uid".to_string(), uid.clone());
        }
        if let Some(email) = &self.email {
            claims.insert("email".to_string(), email.clone());
        }
        if let Some(exp) = self.exp {
            claims.insert("exp".to_string(), json!(exp));
        }
        serde_json::Value::Object(claims)
    }

    /// Sign the claims into a compact JWT
    pub fn sign(self) -> String {
        let claims = self.build_claims();
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(self.algorithm), &claims, &key).expect("failed to sign test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
