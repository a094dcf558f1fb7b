use std::sync::Arc;
use std::time::Duration;

use bookwise_api::{
    cache::Cache,
    config::Config,
    routes::{create_router, AppSettings, AppState},
    services::GoogleBooksProvider,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookwise_api=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = GoogleBooksProvider::with_timeout(
        Cache::default(),
        config.books_api_url.clone(),
        config.books_api_key.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?
    .with_cache_ttl(config.search_cache_ttl_secs);

    tracing::info!(
        api_url = %config.books_api_url,
        api_key_configured = config.books_api_key.is_some(),
        "Catalog provider ready"
    );

    let state = AppState::new(Arc::new(provider), AppSettings::try_from(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
