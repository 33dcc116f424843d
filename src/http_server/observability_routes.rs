//! Liveness and counters
//!
//! `/health` also reports whether the section path table needs a rebuild,
//! so a deploy can tell a fresh corpus from one still waiting for the
//! schedule.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::state::AppState;
use crate::observability::MetricsRegistry;
use crate::store::CorpusStore;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the store cannot be read
    pub status: &'static str,
    pub version: &'static str,
    /// None when the store could not answer
    pub section_paths_stale: Option<bool>,
}

pub fn health_routes<S: CorpusStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<S>))
        .with_state(state)
}

pub fn metrics_routes(metrics: Arc<MetricsRegistry>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn health_handler<S: CorpusStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let stale = state.store.section_paths_stale().await.ok();
    let (status, label) = match stale {
        Some(_) => (StatusCode::OK, "ok"),
        None => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };

    let response = HealthResponse {
        status: label,
        version: env!("CARGO_PKG_VERSION"),
        section_paths_stale: stale,
    };
    (status, Json(response))
}

async fn metrics_handler(State(metrics): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    Json(metrics.to_json())
}
