//! Inbound request hints used during resolution.

use std::net::IpAddr;

use localprice_shared::CurrencyCode;

use super::culture::{culture_for_country, first_accepted_language};

/// Read-only view of the inbound request.
///
/// Built by the HTTP layer from the `culture`, `cc` and `currency` query
/// parameters, the `Accept-Language` header, and the client address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    /// Explicit culture (`culture`), adopted verbatim.
    pub culture: Option<String>,
    /// Explicit country code (`cc`).
    pub country: Option<String>,
    /// Explicit currency code (`currency`).
    pub currency: Option<String>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<String>,
    /// Address of the caller, for IP geolocation.
    pub client_ip: Option<IpAddr>,
}

impl RequestOverrides {
    /// Culture forced by the request: `culture` first, then `cc` through the
    /// country table.
    #[must_use]
    pub fn forced_culture(&self) -> Option<String> {
        non_blank(self.culture.as_deref())
            .map(str::to_string)
            .or_else(|| non_blank(self.country.as_deref()).map(|cc| culture_for_country(cc).to_string()))
    }

    /// Currency forced by the request, uppercased.
    ///
    /// Values that are not three letters are ignored.
    #[must_use]
    pub fn forced_currency(&self) -> Option<CurrencyCode> {
        non_blank(self.currency.as_deref()).and_then(|code| CurrencyCode::new(code).ok())
    }

    /// First locale preference from `Accept-Language`.
    #[must_use]
    pub fn preferred_language(&self) -> Option<String> {
        first_accepted_language(self.accept_language.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_culture_beats_country() {
        let overrides = RequestOverrides {
            culture: Some("fr-FR".into()),
            country: Some("BR".into()),
            ..Default::default()
        };
        assert_eq!(overrides.forced_culture().as_deref(), Some("fr-FR"));
    }

    #[test]
    fn test_country_maps_through_table() {
        let overrides = RequestOverrides {
            country: Some("jp".into()),
            ..Default::default()
        };
        assert_eq!(overrides.forced_culture().as_deref(), Some("ja-JP"));

        let overrides = RequestOverrides {
            country: Some("AR".into()),
            ..Default::default()
        };
        assert_eq!(overrides.forced_culture().as_deref(), Some("en-US"));
    }

    #[test]
    fn test_blank_values_are_absent() {
        let overrides = RequestOverrides {
            culture: Some(" ".into()),
            country: Some(String::new()),
            currency: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(overrides.forced_culture(), None);
        assert_eq!(overrides.forced_currency(), None);
    }

    #[test]
    fn test_currency_is_uppercased() {
        let overrides = RequestOverrides {
            currency: Some("eur".into()),
            ..Default::default()
        };
        assert_eq!(overrides.forced_currency().unwrap().as_str(), "EUR");
    }

    #[test]
    fn test_preferred_language() {
        let overrides = RequestOverrides {
            accept_language: Some("pt-BR,pt;q=0.9".into()),
            ..Default::default()
        };
        assert_eq!(overrides.preferred_language().as_deref(), Some("pt-BR"));
        assert_eq!(RequestOverrides::default().preferred_language(), None);
    }
}
