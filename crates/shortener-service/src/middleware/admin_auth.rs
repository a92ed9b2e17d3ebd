//! Admin authorization gate.
//!
//! Intercepts requests to write endpoints. The bearer token is verified
//! locally (signature, expiry, claims schema) and the final decision is
//! delegated to the SSO service: only identities it confirms as admin are
//! forwarded, with an [`AuthenticatedIdentity`] attached to the request.
//!
//! Rejections deliberately reveal nothing about which check failed: every
//! token-layer failure and the "not admin" answer collapse to the same 403
//! response. The specific reason goes to the log, keyed by request id.

use crate::auth::{token, AuthenticatedIdentity};
use crate::errors::ShortenerError;
use crate::services::SsoClientApi;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// State for the admin gate middleware.
pub struct AdminGateState {
    /// Symmetric key the SSO service signs user tokens with.
    pub app_secret: SecretString,
    /// Client for the remote authorization authority.
    pub sso: Arc<dyn SsoClientApi>,
}

/// Read the request correlation id set by the request-id layer.
fn request_id(req: &Request) -> &str {
    req.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Authorization middleware for admin-only routes.
///
/// # Response
///
/// - 401 Unauthorized if the Authorization header is missing or empty
/// - 403 Forbidden if the token fails validation or SSO denies admin
/// - 500 Internal Server Error if SSO is unreachable after retries
/// - Otherwise forwards with `AuthenticatedIdentity` in the extensions
#[instrument(skip_all, name = "shortener.middleware.admin_auth")]
pub async fn require_admin(
    State(state): State<Arc<AdminGateState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ShortenerError> {
    let request_id = request_id(&req).to_string();

    let Some(auth_header) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
    else {
        info!(
            target: "shortener.middleware.admin_auth",
            request_id = %request_id,
            "unauthorized request: missing token"
        );
        return Err(ShortenerError::MissingToken);
    };

    // The "Bearer " prefix is optional by design: a raw token is accepted
    // as-is. Known leniency carried over from the original deployment.
    let token_str = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    let claims = match token::validate(token_str, &state.app_secret) {
        Ok(claims) => claims,
        Err(e) => {
            info!(
                target: "shortener.middleware.admin_auth",
                request_id = %request_id,
                error = %e,
                "rejected request: token validation failed"
            );
            return Err(ShortenerError::Forbidden);
        }
    };

    let is_admin = match state.sso.is_admin(claims.uid).await {
        Ok(is_admin) => is_admin,
        Err(e) => {
            info!(
                target: "shortener.middleware.admin_auth",
                request_id = %request_id,
                uid = claims.uid,
                error = %e,
                "failed to check admin privilege"
            );
            return Err(ShortenerError::AuthorityUnavailable);
        }
    };

    if !is_admin {
        info!(
            target: "shortener.middleware.admin_auth",
            request_id = %request_id,
            uid = claims.uid,
            "rejected request: not admin"
        );
        return Err(ShortenerError::Forbidden);
    }

    debug!(
        target: "shortener.middleware.admin_auth",
        request_id = %request_id,
        uid = claims.uid,
        "admin access granted"
    );

    // Attach identity to the forwarded request only; the gate never mutates
    // anything request-independent.
    req.extensions_mut().insert(AuthenticatedIdentity {
        user_id: claims.uid,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_falls_back_to_dash() {
        let req = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(request_id(&req), "-");
    }

    #[test]
    fn test_request_id_reads_header() {
        let req = Request::builder()
            .header("x-request-id", "abc-123")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), "abc-123");
    }
}
