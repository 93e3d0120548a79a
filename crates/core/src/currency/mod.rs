//! Locale, currency and exchange-rate resolution for price display.
//!
//! [`CurrencyState`] resolves a culture, currency and USD rate once per
//! request scope, then converts and renders USD prices with
//! [`CurrencyState::format`].

pub mod context;
pub mod culture;
pub mod error;
pub mod format;
pub mod provider;
pub mod rate;
pub mod region;
pub mod state;

#[cfg(test)]
mod props;

pub use context::RequestOverrides;
pub use culture::{FALLBACK_CULTURE, culture_for_country, first_accepted_language};
pub use error::CurrencyError;
pub use format::{CurrencyFormat, checked_convert_amount, convert_amount, format_currency};
pub use provider::{GeoLocation, JsonFetcher, RatesResponse, geolocation_url, rates_url};
pub use rate::RateCache;
pub use region::{NumberConventions, RegionInfo, SymbolPosition, known_cultures, region_for};
pub use state::{CurrencySnapshot, CurrencyState};
