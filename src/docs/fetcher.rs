//! Cache-aside document fetcher.
//!
//! Lookup order is fixed: cache read, then origin GET, then cache write.
//! Only successful upstream responses are written back; failures are handed
//! to the caller untouched so the next call retries the origin.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::docs::cache::{CachedResponse, ResponseCache};

pub const DEFAULT_TTL_SECONDS: u64 = 3600;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("fetch cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone)]
pub struct FetchedText {
    pub status: StatusCode,
    pub text: String,
    pub cache: CacheStatus,
}

impl FetchedText {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub struct DocsFetcher {
    http: Client,
    cache: Arc<dyn ResponseCache>,
}

impl DocsFetcher {
    pub fn new(timeout: Duration, cache: Arc<dyn ResponseCache>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { http, cache })
    }

    pub async fn fetch_cached(
        &self,
        url: &str,
        ttl_seconds: u64,
    ) -> Result<FetchedText, FetchError> {
        let target = parse_http_url(url)?;

        if let Some(cached) = self.cache.get(url).await {
            debug!(url, "docs cache hit");
            return Ok(FetchedText {
                status: cached.status,
                text: cached.text(),
                cache: CacheStatus::Hit,
            });
        }

        debug!(url, "docs cache miss");
        let response = self
            .http
            .get(target)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(format!("failed to read response: {err}")))?;
        let text = String::from_utf8_lossy(&body).into_owned();

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "upstream fetch failed");
            return Ok(FetchedText {
                status,
                text,
                cache: CacheStatus::Miss,
            });
        }

        let entry = CachedResponse {
            status,
            headers,
            body,
        }
        .with_max_age(ttl_seconds);
        self.cache.put(url, entry).await;

        Ok(FetchedText {
            status,
            text,
            cache: CacheStatus::Miss,
        })
    }

    /// Same as [`fetch_cached`](Self::fetch_cached) but gives up as soon as
    /// `cancel` fires. Nothing is written to the cache after cancellation.
    pub async fn fetch_cached_with_cancel(
        &self,
        url: &str,
        ttl_seconds: u64,
        cancel: &CancellationToken,
    ) -> Result<FetchedText, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.fetch_cached(url, ttl_seconds) => result,
        }
    }
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }
    Ok(parsed)
}
