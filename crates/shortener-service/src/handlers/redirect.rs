//! Redirect handler.
//!
//! GET /{alias} (public)

use crate::errors::ShortenerError;
use crate::handlers::AppState;
use crate::repositories::RepositoryError;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Resolve an alias and answer with a 302 redirect to the stored URL.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(alias): Path<String>,
) -> Result<Response, ShortenerError> {
    let url = state
        .repository
        .get_url(&alias)
        .await
        .map_err(|e| match e {
            RepositoryError::AliasNotFound => {
                info!(target: "shortener.handlers.redirect", alias = %alias, "alias not found");
                ShortenerError::AliasNotFound
            }
            _ => {
                error!(target: "shortener.handlers.redirect", error = %e, "failed to get url");
                ShortenerError::Internal
            }
        })?;

    debug!(target: "shortener.handlers.redirect", alias = %alias, url = %url, "redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
