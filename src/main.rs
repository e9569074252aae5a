use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comment_service::{
    CommentService, app,
    config::{Config, StorageConfig},
    db::{self, CommentStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comment_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    match config.storage {
        StorageConfig::MySql(settings) => {
            let store = db::mysql::init_db(&settings)
                .await
                .context("Could not set up MySQL database")?;
            serve(config.server_addr, CommentService::new(store)).await
        }
        StorageConfig::Sqlite { url } => {
            let store = db::sqlite::init_db(&url)
                .await
                .with_context(|| format!("Could not set up SQLite database at {url}"))?;
            serve(config.server_addr, CommentService::new(store)).await
        }
    }
}

async fn serve<S: CommentStore>(addr: SocketAddr, service: CommentService<S>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
