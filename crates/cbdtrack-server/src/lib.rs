//! HTTP dashboard server for the CBD novel food applications tracker.
//!
//! The server consists of:
//! - **State**: the current dataset snapshot, swapped atomically per refresh
//! - **Routes**: the page, the JSON API, and the reactive status pie
//! - **Refresh**: a background task polling the feed on a fixed interval
//! - **Page**: the embedded dashboard HTML

pub mod error;
pub mod page;
pub mod refresh;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

pub use error::{ServerError, ServerResult};
pub use routes::create_router;
pub use state::{AppState, ChartSet, FeedHealth, Snapshot};

use cbdtrack_core::loader;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Feed endpoint to poll.
    pub source_url: String,
    /// Delay between refresh cycles.
    pub refresh_interval: Duration,
    /// Whether the background refresher runs at all.
    pub refresh_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            source_url: loader::DEFAULT_SOURCE_URL.to_string(),
            refresh_interval: Duration::from_secs(15 * 60),
            refresh_enabled: true,
        }
    }
}

/// Start the dashboard server and run until shutdown.
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    let state = Arc::new(AppState::new(config.source_url.clone()));

    // Load once before accepting traffic. A failing feed is not fatal: the
    // server starts with an empty, stale-marked dataset and the refresher
    // retries on its schedule.
    match loader::fetch_dataset(&config.source_url).await {
        Ok(dataset) => {
            tracing::info!("initial feed load: {} applications", dataset.len());
            state.install(dataset).await;
        }
        Err(err) => {
            tracing::warn!("initial feed load failed: {}", err);
            state.record_failure().await;
        }
    }

    let refresher = if config.refresh_enabled {
        Some(refresh::spawn(state.clone(), config.refresh_interval))
    } else {
        None
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| ServerError::Bind {
            addr: addr.clone(),
            message: err.to_string(),
        })?;

    tracing::info!("Dashboard listening at http://{}", addr);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Handle Ctrl+C for graceful shutdown
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });

    server.await?;

    if let Some(task) = refresher {
        task.abort();
        let _ = task.await;
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
