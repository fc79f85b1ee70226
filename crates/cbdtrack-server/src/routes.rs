//! HTTP routes for the dashboard.
//!
//! Everything reads from the current snapshot; no handler blocks on the
//! refresher. The status pie endpoint is the page's one reactive binding:
//! the dropdown issues a plain GET and swaps in the returned figure.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use cbdtrack_core::analytics;
use cbdtrack_core::chart::{self, Figure};

use crate::page;
use crate::state::{AppState, ChartSet};

/// Build the dashboard router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/health", get(health_handler))
        .route("/api/summary", get(summary_handler))
        .route("/api/manufacturers", get(manufacturers_handler))
        .route("/api/charts", get(charts_handler))
        .route("/api/charts/status", get(status_pie_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the embedded dashboard page.
async fn page_handler() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

/// Health check endpoint.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Headline counts plus feed health for the page header.
async fn summary_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.snapshot().await;
    let health = state.health().await;
    Json(serde_json::json!({
        "applications": snapshot.summary.applications,
        "companies": snapshot.summary.companies,
        "last_updated": snapshot.summary.last_updated,
        "source_url": state.source_url,
        "feed": health,
    }))
}

/// Dropdown options: distinct manufacturer names.
async fn manufacturers_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.snapshot().await.manufacturers.clone())
}

/// The five precomputed figures, keyed by panel id.
async fn charts_handler(State(state): State<Arc<AppState>>) -> Json<ChartSet> {
    Json(state.snapshot().await.charts.clone())
}

#[derive(Debug, Deserialize)]
struct StatusPieQuery {
    manufacturer: Option<String>,
}

/// Status pie, filtered to one manufacturer when requested.
async fn status_pie_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusPieQuery>,
) -> Json<Figure> {
    let snapshot = state.snapshot().await;
    // The page's placeholder option submits an empty value; treat it the
    // same as no filter.
    let filter = query
        .manufacturer
        .as_deref()
        .filter(|name| !name.is_empty());
    let breakdown = analytics::status_breakdown(&snapshot.dataset, filter);
    Json(chart::status_pie(&breakdown))
}
