use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::ws;
use crate::capture;

/// Build the complete axum Router with all gateway routes.
///
/// The request-capture middleware wraps every route, so the gateway's
/// own traffic (including each consumer's upgrade request) flows through
/// the pipeline it serves.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/logs/stream", get(ws::stream_logs))
        .route("/healthz", get(health))
        .layer(middleware::from_fn_with_state(
            state.emitter.clone(),
            capture::track,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
