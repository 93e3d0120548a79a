//! USD price conversion and formatting.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::Query,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use localprice_shared::{AppError, CurrencyCode};

use crate::{AppState, error::ApiError, extractors::CurrencyContext};

/// Creates the price routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/prices/format", get(format_price))
}

/// Query parameters for formatting a price.
#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    /// Amount in US dollars, as a decimal string.
    pub usd: Option<String>,
}

/// A USD price rendered for the caller's locale.
#[derive(Debug, Serialize)]
pub struct FormattedPrice {
    /// Requested USD amount.
    pub usd: Decimal,
    /// Amount in the local currency, rounded to the locale's digits.
    pub local_amount: Decimal,
    /// Display string, e.g. `R$ 50,00`.
    pub formatted: String,
    /// Culture used for rendering.
    pub culture: String,
    /// Local currency code.
    pub currency: CurrencyCode,
}

fn parse_usd(raw: Option<&str>) -> Result<Decimal, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation("usd is required".to_string()))?;

    Decimal::from_str(raw)
        .map_err(|_| AppError::Validation(format!("usd must be a decimal amount, got {raw:?}")))
}

/// GET `/prices/format?usd=` - Convert a USD amount and render it locally.
async fn format_price(
    CurrencyContext(state): CurrencyContext,
    Query(query): Query<FormatQuery>,
) -> Result<Json<FormattedPrice>, ApiError> {
    let usd = parse_usd(query.usd.as_deref())?;

    state.ensure_loaded().await;

    let local_amount = state.checked_convert(usd).ok_or_else(|| {
        AppError::Validation(format!(
            "usd {usd} is too large to convert to {}",
            state.currency_code()
        ))
    })?;

    Ok(Json(FormattedPrice {
        usd,
        local_amount,
        formatted: state.format(usd),
        culture: state.culture_name(),
        currency: state.currency_code(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10", "10")]
    #[case(" 19.99 ", "19.99")]
    #[case("-5.5", "-5.5")]
    fn test_parse_usd(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse_usd(Some(raw)).unwrap(), Decimal::from_str(expected).unwrap());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("ten"))]
    #[case(Some("1,50"))]
    fn test_parse_usd_rejects(#[case] raw: Option<&str>) {
        assert!(matches!(parse_usd(raw), Err(AppError::Validation(_))));
    }
}
