use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> &'static str {
    "API is up and running!"
}

/// GET /health
/// Returns a simple status object with service version and active profile.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "profile-board-api",
        "environment": state.config.environment.as_str()
    }))
}
