//! Delete URL handler.
//!
//! DELETE /url/{alias} (admin-gated)

use crate::errors::ShortenerError;
use crate::handlers::AppState;
use crate::repositories::RepositoryError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{error, info};

/// Remove an alias.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(alias): Path<String>,
) -> Result<StatusCode, ShortenerError> {
    state
        .repository
        .delete_url(&alias)
        .await
        .map_err(|e| match e {
            RepositoryError::AliasNotFound => {
                info!(target: "shortener.handlers.delete", alias = %alias, "alias not found");
                ShortenerError::AliasNotFound
            }
            _ => {
                error!(target: "shortener.handlers.delete", error = %e, "failed to delete url");
                ShortenerError::Internal
            }
        })?;

    info!(target: "shortener.handlers.delete", alias = %alias, "alias deleted");

    Ok(StatusCode::NO_CONTENT)
}
