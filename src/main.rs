use std::sync::Arc;

use hono_docs_mcp::{
    build_app,
    config::Config,
    docs::cache::{run_expiry_sweeper, MemoryResponseCache},
    logging, AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let shutdown = CancellationToken::new();
    let cache = Arc::new(MemoryResponseCache::new());
    let sweeper = tokio::spawn(run_expiry_sweeper(
        cache.clone(),
        config.cache_sweep_interval(),
        shutdown.clone(),
    ));
    let state = AppState::from_config(&config, cache, shutdown.clone())?;
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_socket()?).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        docs_base_url = %config.docs_base_url,
        cache_ttl_seconds = config.cache_ttl_seconds,
        "server starting"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(err) = sweeper.await {
        tracing::warn!(error = %err, "cache sweeper task failed");
    }

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("shutdown requested");
    shutdown.cancel();
}
