// HTTP request handlers
use crate::infrastructure::sse::dashboard_events;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    response::{sse::KeepAlive, IntoResponse, Sse},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard_snapshot))
        .route("/events", get(stream_events))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard state
pub async fn dashboard_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshots.borrow().clone();
    Json(snapshot)
}

/// Live dashboard updates as Server-Sent Events
pub async fn stream_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let events = state.events.subscribe();
    Sse::new(dashboard_events(state.snapshots.clone(), events)).keep_alive(KeepAlive::default())
}
