//! Resolved locale and currency for the caller.

use axum::{Json, Router, routing::get};
use tracing::debug;

use localprice_core::currency::CurrencySnapshot;

use crate::{AppState, extractors::CurrencyContext};

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/currency", get(get_currency))
}

/// GET `/currency` - Resolve and return culture, currency, symbol and rate.
async fn get_currency(CurrencyContext(state): CurrencyContext) -> Json<CurrencySnapshot> {
    state.ensure_loaded().await;
    let snapshot = state.snapshot();
    debug!(culture = %snapshot.culture_name, currency = %snapshot.currency_code, "currency served");
    Json(snapshot)
}
