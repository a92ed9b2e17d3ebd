//! Save URL handler.
//!
//! POST /url (admin-gated)

use crate::alias;
use crate::errors::ShortenerError;
use crate::handlers::AppState;
use crate::models::ApiStatus;
use crate::repositories::RepositoryError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Uri,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    pub alias: String,
}

/// Accepts absolute http(s) URLs only.
fn is_valid_url(raw: &str) -> bool {
    raw.parse::<Uri>()
        .map(|uri| matches!(uri.scheme_str(), Some("http" | "https")) && uri.authority().is_some())
        .unwrap_or(false)
}

/// Handle saving a URL under a short alias.
///
/// When the request carries no alias, a random one of the configured length
/// is generated.
pub async fn save(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ShortenerError> {
    let Json(request) = payload.map_err(|e| {
        debug!(target: "shortener.handlers.save", error = %e, "failed to decode request body");
        ShortenerError::BadRequest("failed to decode request".to_string())
    })?;

    if request.url.is_empty() {
        return Err(ShortenerError::BadRequest(
            "field URL is a required field".to_string(),
        ));
    }
    if !is_valid_url(&request.url) {
        return Err(ShortenerError::BadRequest(
            "field URL is not a valid URL".to_string(),
        ));
    }

    let alias = match request.alias.filter(|a| !a.is_empty()) {
        Some(alias) => alias,
        None => alias::generate(state.alias_length),
    };

    let id = state
        .repository
        .save_url(&request.url, &alias)
        .await
        .map_err(|e| match e {
            RepositoryError::AliasExists => {
                info!(
                    target: "shortener.handlers.save",
                    url = %request.url,
                    "url already exists"
                );
                ShortenerError::AliasExists
            }
            _ => {
                error!(target: "shortener.handlers.save", error = %e, "failed to add url");
                ShortenerError::Internal
            }
        })?;

    info!(target: "shortener.handlers.save", id, alias = %alias, "url added");

    Ok(Json(SaveResponse {
        status: ApiStatus::ok(),
        alias,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::repositories::UrlRepository;
    use async_trait::async_trait;

    /// Repository whose every operation fails with a backend error.
    struct FailingRepository;

    #[async_trait]
    impl UrlRepository for FailingRepository {
        async fn save_url(&self, _url: &str, _alias: &str) -> Result<i64, RepositoryError> {
            Err(RepositoryError::Internal("connection reset".to_string()))
        }

        async fn get_url(&self, _alias: &str) -> Result<String, RepositoryError> {
            Err(RepositoryError::Internal("connection reset".to_string()))
        }

        async fn delete_url(&self, _alias: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::Internal("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_storage_failure_maps_to_internal_error() {
        let state = Arc::new(AppState {
            repository: Arc::new(FailingRepository),
            alias_length: 6,
        });
        let payload = Ok(Json(SaveRequest {
            url: "https://example.com".to_string(),
            alias: Some("x".to_string()),
        }));

        let result = save(State(state), payload).await;
        assert!(matches!(result, Err(ShortenerError::Internal)));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));

        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }
}
