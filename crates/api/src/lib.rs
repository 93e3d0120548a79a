//! HTTP API layer with Axum routes and request extractors.
//!
//! This crate provides:
//! - REST API routes
//! - The per-request currency extractor
//! - Error responses

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use localprice_core::currency::JsonFetcher;
use localprice_shared::AppConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// HTTP transport for geolocation and rate providers.
    pub fetcher: Arc<dyn JsonFetcher>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
