//! Process-wide response cache keyed by request URL.
//!
//! Entries carry the upstream status, headers and body. Freshness is driven by
//! the `max-age` directive of the stored `cache-control` header.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, CACHE_CONTROL},
    StatusCode,
};
use tokio::{sync::RwLock, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    /// Replace any upstream `cache-control` with `public, max-age=<ttl_seconds>`.
    pub fn with_max_age(mut self, ttl_seconds: u64) -> Self {
        self.headers.remove(CACHE_CONTROL);
        if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={ttl_seconds}")) {
            self.headers.insert(CACHE_CONTROL, value);
        }
        self
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.headers
            .get_all(CACHE_CONTROL)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .filter_map(|directive| {
                let (name, seconds) = directive.trim().split_once('=')?;
                if !name.trim().eq_ignore_ascii_case("max-age") {
                    return None;
                }
                seconds.trim().trim_matches('"').parse::<u64>().ok()
            })
            .map(Duration::from_secs)
            .next()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedResponse>;
    async fn put(&self, key: &str, response: CachedResponse);
}

struct StoredEntry {
    response: CachedResponse,
    stored_at: Instant,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        match self.response.max_age() {
            Some(max_age) => self.stored_at.elapsed() >= max_age,
            None => false,
        }
    }
}

/// In-memory cache behind a tokio `RwLock`.
///
/// Expired entries are treated as misses and dropped on lookup.
#[derive(Default)]
pub struct MemoryResponseCache {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }
}

#[cfg(test)]
impl MemoryResponseCache {
    pub(crate) async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub(crate) async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Drops expired entries every `every` until `shutdown` fires.
///
/// Lookups already treat expired entries as misses; the sweep only bounds how
/// long entries that are never looked up again stay resident.
pub async fn run_expiry_sweeper(
    cache: Arc<MemoryResponseCache>,
    every: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let purged = cache.purge_expired().await;
                if purged > 0 {
                    debug!(purged, "expired cache entries swept");
                }
            }
        }
    }

    debug!("cache sweeper stopped");
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &str) -> Option<CachedResponse> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(entry.response.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoredEntry::is_expired) {
            entries.remove(key);
            debug!(key, "expired cache entry dropped");
        }
        None
    }

    async fn put(&self, key: &str, response: CachedResponse) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoredEntry {
                response,
                stored_at: Instant::now(),
            },
        );
    }
}
