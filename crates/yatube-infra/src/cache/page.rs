//! Whole-page cache for rendered listings.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use yatube_core::ports::{Cache, CacheError};

const KEY_PREFIX: &str = "page";

/// Rendered page bodies keyed by request address, expiring after a fixed TTL.
///
/// Content changes do not invalidate entries; a stale page is served until it
/// expires or [`PageCache::flush`] is called.
#[derive(Clone)]
pub struct PageCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache key for a route and its raw query string.
    pub fn key_for(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{KEY_PREFIX}:{path}")
        } else {
            format!("{KEY_PREFIX}:{path}?{query}")
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await
    }

    /// Store a rendered body. Failures are logged, never surfaced.
    pub async fn put(&self, key: &str, body: &str) {
        if let Err(e) = self.cache.set(key, body, Some(self.ttl)).await {
            tracing::warn!(cache_key = %key, error = %e, "Failed to store cached page");
        }
    }

    /// Return the cached body for `key`, rendering and storing it on a miss.
    pub async fn get_or_render<F, Fut, E>(&self, key: &str, render: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(body) = self.get(key).await {
            tracing::debug!(cache_key = %key, "Page cache hit");
            return Ok(body);
        }

        tracing::debug!(cache_key = %key, "Page cache miss");
        let body = render().await?;
        self.put(key, &body).await;
        Ok(body)
    }

    /// Drop every cached page.
    pub async fn flush(&self) -> Result<(), CacheError> {
        self.cache.clear().await?;
        tracing::info!("Page cache flushed");
        Ok(())
    }
}
