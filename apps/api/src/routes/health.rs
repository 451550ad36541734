use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / and GET /health
/// Reports liveness and whether generation calls are live or on fallbacks.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let mode = if state.enricher.is_live() {
        "live"
    } else {
        "fallback"
    };
    Json(json!({
        "status": "ok",
        "message": "AI Feedback System API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "generation_mode": mode
    }))
}
