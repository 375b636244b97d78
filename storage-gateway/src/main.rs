use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use shared::observability::init_logging;
use storage_gateway::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_logging(config.log_config()).context("Failed to initialize logging")?;

    info!("Starting Storage Gateway v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to initialize file store at {}",
                config.storage.root.display()
            )
        })?;
    info!(root = %state.store.root().display(), "Storing uploads");

    let app = create_router(state);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .context("Failed to bind to address")?;
    let addr = listener.local_addr().context("Failed to read bound address")?;

    info!("Storage Gateway running on http://{}", addr);
    info!("File list available at http://{}/download", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Storage Gateway shut down gracefully");
    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
