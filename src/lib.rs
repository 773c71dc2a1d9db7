use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;

pub mod config;
pub mod docs;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use config::Config;
use docs::{
    cache::ResponseCache,
    fetcher::{DocsFetcher, FetchError},
};
use domain::utils::DocsSite;

/// Process-scoped state, built once in `main` and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<DocsFetcher>,
    pub site: Arc<DocsSite>,
    pub cache_ttl_seconds: u64,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        fetcher: Arc<DocsFetcher>,
        site: DocsSite,
        cache_ttl_seconds: u64,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            site: Arc::new(site),
            cache_ttl_seconds,
            shutdown,
        }
    }

    pub fn from_config(
        config: &Config,
        cache: Arc<dyn ResponseCache>,
        shutdown: CancellationToken,
    ) -> Result<Self, FetchError> {
        let fetcher = DocsFetcher::new(config.fetch_timeout(), cache)?;
        Ok(Self::new(
            Arc::new(fetcher),
            DocsSite::new(&config.docs_base_url, &config.docs_content_base_url),
            config.cache_ttl_seconds,
            shutdown,
        ))
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::status))
        .route("/health", get(http::handlers::health))
        .route(http::handlers::MCP_ENDPOINT, post(http::handlers::mcp_endpoint))
        .fallback(http::handlers::not_found)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
