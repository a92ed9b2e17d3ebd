use crate::models::ApiStatus;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Service-level error type.
///
/// Every failure is mapped to an HTTP status with a deliberately generic
/// body: token-layer failures all collapse to the same 403 response so a
/// caller cannot probe which validation step rejected the token.
#[derive(Debug, Error)]
pub enum ShortenerError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("forbidden")]
    Forbidden,

    #[error("authorization authority unavailable")]
    AuthorityUnavailable,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("url alias already exists")]
    AliasExists,

    #[error("url alias not found")]
    AliasNotFound,

    #[error("internal error")]
    Internal,
}

impl IntoResponse for ShortenerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ShortenerError::MissingToken => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ShortenerError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ShortenerError::AuthorityUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
            ShortenerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ShortenerError::AliasExists => (StatusCode::CONFLICT, "url already exists".to_string()),
            ShortenerError::AliasNotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ShortenerError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(ApiStatus::error(message))).into_response()
    }
}
