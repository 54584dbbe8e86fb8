use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when conversations cannot reach a model.
    pub status: &'static str,
    pub version: &'static str,
    /// Whether an upstream API key is configured.
    pub upstream_configured: bool,
    /// `file` or `memory`.
    pub progress_store: &'static str,
}

/// GET /health -- liveness plus a summary of what the server can serve.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let upstream_configured = state.config.openai.api_key.is_some();
    let progress_store = match state.config.progress_dir {
        Some(_) => "file",
        None => "memory",
    };

    Json(HealthResponse {
        status: if upstream_configured { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        upstream_configured,
        progress_store,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
