//! Liveness endpoint.
//!
//! The only HTTP surface the service exposes: deployment probes hit
//! `GET /health` to confirm the process is up and which build is running.
//! Everything else flows through the chat transport, not HTTP.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process can answer at all.
    pub status: String,
    /// Version of the running binary, baked in at compile time.
    pub version: String,
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// Router exposing the liveness probe.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
