//! Liveness endpoint.
//!
//! Answers without touching the geolocation or rate providers, so it stays
//! green while they are down.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Crate version of the API layer.
    pub version: &'static str,
}

const HEALTHY: HealthResponse = HealthResponse {
    status: "ok",
    version: env!("CARGO_PKG_VERSION"),
};

async fn health() -> Json<HealthResponse> {
    Json(HEALTHY)
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
