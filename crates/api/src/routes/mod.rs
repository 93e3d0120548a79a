//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod currency;
pub mod health;
pub mod prices;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(currency::routes())
        .merge(prices::routes())
}
