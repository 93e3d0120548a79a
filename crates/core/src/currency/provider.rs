//! External collaborators: JSON-over-HTTP and the payloads read from it.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::error::CurrencyError;

/// Fetches a URL and parses the body as JSON.
///
/// Implementations make a single attempt and give up after `timeout`.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GET `url` and return the decoded body.
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, CurrencyError>;
}

/// IP geolocation payload. Both fields are optional upstream.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GeoLocation {
    /// Two-letter country code.
    #[serde(default)]
    pub country: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Set by the provider on rate limiting or reserved addresses.
    #[serde(default)]
    pub error: bool,
    /// Provider explanation accompanying `error`.
    #[serde(default)]
    pub reason: Option<String>,
}

impl GeoLocation {
    /// Decodes a geolocation body, treating provider-reported errors as failures.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::InvalidResponse`] for malformed bodies or error payloads.
    pub fn from_json(body: Value) -> Result<Self, CurrencyError> {
        let location: Self = serde_json::from_value(body)?;
        if location.error {
            return Err(CurrencyError::invalid_response(
                location
                    .reason
                    .unwrap_or_else(|| "geolocation provider reported an error".to_string()),
            ));
        }
        Ok(location)
    }

    /// Country code, if present and non-blank.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }

    /// Currency code, if present and non-blank.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        non_blank(self.currency.as_deref())
    }
}

/// Exchange-rate payload quoted against USD.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesResponse {
    /// Currency code → units per USD. Entries are decoded lazily.
    pub rates: HashMap<String, Value>,
}

impl RatesResponse {
    /// Decodes an exchange-rate body.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::InvalidResponse`] if `rates` is missing or not an object.
    pub fn from_json(body: Value) -> Result<Self, CurrencyError> {
        Ok(serde_json::from_value(body)?)
    }

    /// Returns the positive rate for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::RateUnavailable`] if the entry is missing,
    /// not numeric, or not positive.
    pub fn rate_for(&self, code: &str) -> Result<Decimal, CurrencyError> {
        let raw = self
            .rates
            .get(code)
            .ok_or_else(|| CurrencyError::RateUnavailable(code.to_string()))?;

        let rate = match raw {
            Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
            _ => None,
        }
        .or_else(|| raw.as_f64().and_then(|f| Decimal::try_from(f).ok()))
        .ok_or_else(|| CurrencyError::RateUnavailable(code.to_string()))?;

        if rate <= Decimal::ZERO {
            return Err(CurrencyError::RateUnavailable(code.to_string()));
        }
        Ok(rate)
    }
}

/// Builds the geolocation URL, scoped to `ip` when the caller's address is known.
#[must_use]
pub fn geolocation_url(base: &str, ip: Option<IpAddr>) -> String {
    let base = base.trim_end_matches('/');
    match ip {
        Some(ip) => format!("{base}/{ip}/json/"),
        None => format!("{base}/json/"),
    }
}

/// Builds the exchange-rate URL, substituting `{code}` when the template has it.
#[must_use]
pub fn rates_url(template: &str, code: &str) -> String {
    template.replace("{code}", code)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
