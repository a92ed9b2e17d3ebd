//! In-process URL repository.

use crate::repositories::{RepositoryError, UrlRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredUrl {
    id: i64,
    url: String,
}

/// Alias mapping held in memory behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    urls: RwLock<HashMap<String, StoredUrl>>,
    next_id: AtomicI64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for MemoryRepository {
    async fn save_url(&self, url: &str, alias: &str) -> Result<i64, RepositoryError> {
        let mut urls = self.urls.write().await;

        if urls.contains_key(alias) {
            return Err(RepositoryError::AliasExists);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        urls.insert(
            alias.to_string(),
            StoredUrl {
                id,
                url: url.to_string(),
            },
        );

        Ok(id)
    }

    async fn get_url(&self, alias: &str) -> Result<String, RepositoryError> {
        self.urls
            .read()
            .await
            .get(alias)
            .map(|stored| stored.url.clone())
            .ok_or(RepositoryError::AliasNotFound)
    }

    async fn delete_url(&self, alias: &str) -> Result<(), RepositoryError> {
        self.urls
            .write()
            .await
            .remove(alias)
            .map(|_| ())
            .ok_or(RepositoryError::AliasNotFound)
    }
}
