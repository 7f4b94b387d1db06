//! Highlighter Server
//!
//! Accepts a PDF and a reading time, asks a language model which sentences
//! fit that time, and returns a link to a copy of the PDF with those
//! sentences highlighted.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use highlighter_server::config::Config;
use highlighter_server::oracle::{OpenAiOracle, SelectionOracle};
use highlighter_server::routes;
use highlighter_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "highlighter_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Starting Highlighter Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Output directory: {}", config.output.dir.display());
    tracing::info!("Public base URL: {}", config.output.public_base_url);
    tracing::info!("Oracle: {} ({})", config.oracle.endpoint, config.oracle.model);
    if config.oracle.api_key.is_none() {
        tracing::warn!("No oracle API key set; highlight requests will fail until one is configured");
    }

    let oracle: Arc<dyn SelectionOracle> = Arc::new(
        OpenAiOracle::new(config.oracle.clone()).context("Failed to initialize oracle client")?,
    );

    let app_state = AppState::new(config.clone(), oracle);
    app_state
        .delivery()
        .ensure_dir()
        .await
        .context("Failed to prepare output directory")?;

    let app = routes::router(app_state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Highlighter Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
