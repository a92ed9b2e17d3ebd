//! URL storage layer.
//!
//! The [`UrlRepository`] trait is the seam between the HTTP handlers and
//! whatever holds the alias mapping; [`MemoryRepository`] is the shipped
//! in-process implementation.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryRepository;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("url alias already exists")]
    AliasExists,

    #[error("url alias not found")]
    AliasNotFound,

    /// Backend failure unrelated to the alias itself. Never produced by the
    /// in-memory store; a database-backed implementation maps its driver
    /// errors here.
    #[error("storage error: {0}")]
    Internal(String),
}

/// Storage operations for the alias mapping.
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Store `url` under `alias`, returning the record id.
    async fn save_url(&self, url: &str, alias: &str) -> Result<i64, RepositoryError>;

    /// Resolve an alias to the stored URL.
    async fn get_url(&self, alias: &str) -> Result<String, RepositoryError>;

    /// Remove an alias.
    async fn delete_url(&self, alias: &str) -> Result<(), RepositoryError>;
}
