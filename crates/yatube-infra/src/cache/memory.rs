//! In-memory cache implementation - used as fallback when Redis is unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{Cache, CacheError};

/// Entry limit of a cache built with [`InMemoryCache::new`].
const DEFAULT_MAX_ENTRIES: usize = 300;

/// A full cache drops this fraction (1/n) of its entries at once.
const CULL_FREQUENCY: usize = 3;

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() >= exp)
            .unwrap_or(false)
    }
}

/// In-memory cache using a HashMap behind an async RwLock.
///
/// Data is lost on process restart and not shared between server processes.
/// The map holds at most `max_entries`; inserting into a full map first drops
/// expired entries, then the ones closest to expiry.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }
}

/// Make room for one more entry.
fn cull(store: &mut HashMap<String, CacheEntry>, max_entries: usize) {
    store.retain(|_, entry| !entry.is_expired());
    if store.len() < max_entries {
        return;
    }

    let mut by_expiry: Vec<(Option<Instant>, String)> = store
        .iter()
        .map(|(key, entry)| (entry.expires_at, key.clone()))
        .collect();
    // Entries without a TTL go last.
    by_expiry.sort_by_key(|(expires_at, _)| (expires_at.is_none(), *expires_at));

    let doomed = (store.len() / CULL_FREQUENCY).max(1);
    for (_, key) in by_expiry.into_iter().take(doomed) {
        store.remove(&key);
    }
    tracing::debug!(removed = doomed, remaining = store.len(), "In-memory cache culled");
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if entry.is_expired() {
            drop(store);
            let mut store = self.store.write().await;
            // Re-check: another writer may have refreshed the entry meanwhile.
            if store.get(key).is_some_and(CacheEntry::is_expired) {
                store.remove(key);
            }
            return None;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        if !store.contains_key(key) && store.len() >= self.max_entries {
            cull(&mut store, self.max_entries);
        }
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.store.write().await.clear();
        Ok(())
    }
}
