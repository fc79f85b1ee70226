//! Periodic feed refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use cbdtrack_core::loader;

use crate::state::AppState;

/// Spawn the background refresher.
///
/// Ticks that land while a fetch is still in flight are skipped rather than
/// queued, so a feed slower than the interval never builds a backlog.
pub fn spawn(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the startup load already
        // covered that cycle.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            refresh_once(&state).await;
        }
    })
}

/// Run one refresh cycle, retaining the current snapshot on failure.
pub async fn refresh_once(state: &AppState) {
    tracing::debug!("refreshing feed from {}", state.source_url);
    match loader::fetch_dataset(&state.source_url).await {
        Ok(dataset) => {
            tracing::info!("feed refreshed: {} applications", dataset.len());
            state.install(dataset).await;
        }
        Err(err) => {
            tracing::warn!("feed refresh failed, keeping previous data: {}", err);
            state.record_failure().await;
        }
    }
}
