use anyhow::Context;
use api_server::{router, serve, AppState};
use application::ArticleApp;
use config::Config;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("postdesk=info,api_server=info,tower_http=debug")),
        )
        .init();

    info!("Starting postdesk article service");

    // Load configuration from environment
    let config = Config::from_env(None).context("Failed to load configuration")?;
    config.print_config();

    let article_app = Arc::new(
        ArticleApp::new(&config.database_url, config.database_pool_size)
            .context("Failed to open article database")?,
    );
    let app = router(AppState::new(article_app.clone()), &config.cors);

    let listener = tokio::net::TcpListener::bind(config.api_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.api_address()))?;

    serve(listener, app, shutdown_signal()).await?;

    info!("Shutting down article service");
    match Arc::try_unwrap(article_app) {
        Ok(article_app) => article_app.shutdown(),
        Err(still_shared) => warn!(
            references = Arc::strong_count(&still_shared),
            "article app still referenced after shutdown, pool closes on drop"
        ),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
