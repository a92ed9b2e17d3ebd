//! HTTP request handlers.

use crate::repositories::UrlRepository;
use std::sync::Arc;

pub mod delete;
pub mod redirect;
pub mod save;

/// Shared application state for the URL handlers.
pub struct AppState {
    pub repository: Arc<dyn UrlRepository>,
    /// Length of generated aliases when the client does not supply one.
    pub alias_length: usize,
}
