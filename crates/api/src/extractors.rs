//! Request extractors.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts, Query},
    http::{HeaderMap, HeaderName, header::ACCEPT_LANGUAGE, request::Parts},
};
use serde::Deserialize;
use tracing::debug;

use localprice_core::currency::{CurrencyState, RequestOverrides};

use crate::AppState;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Override parameters accepted on any route.
#[derive(Debug, Default, Deserialize)]
struct OverrideParams {
    culture: Option<String>,
    cc: Option<String>,
    currency: Option<String>,
}

/// Builds the request view used during currency resolution.
///
/// Malformed query strings are treated as carrying no overrides.
pub fn request_overrides(parts: &Parts) -> RequestOverrides {
    let params = Query::<OverrideParams>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .unwrap_or_else(|err| {
            debug!(error = %err, "ignoring malformed override parameters");
            OverrideParams::default()
        });

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    RequestOverrides {
        culture: params.culture,
        country: params.cc,
        currency: params.currency,
        accept_language: header_str(&parts.headers, &ACCEPT_LANGUAGE),
        client_ip: forwarded_for(&parts.headers).or(peer),
    }
}

fn header_str(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}

/// First address in `X-Forwarded-For`, the originating client.
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Unresolved currency state for the current request.
///
/// Handlers call [`CurrencyState::ensure_loaded`] before reading it:
///
/// ```ignore
/// async fn handler(CurrencyContext(state): CurrencyContext) -> String {
///     state.ensure_loaded().await;
///     state.format(dec!(9.99))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrencyContext(pub CurrencyState);

impl FromRequestParts<AppState> for CurrencyContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let overrides = request_overrides(parts);
        Ok(Self(CurrencyState::new(
            state.fetcher.clone(),
            overrides,
            state.config.currency.clone(),
            state.config.providers.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_query_overrides() {
        let parts = parts("/api/v1/currency?culture=de-DE&cc=BR&currency=eur", &[]);
        let overrides = request_overrides(&parts);

        assert_eq!(overrides.culture.as_deref(), Some("de-DE"));
        assert_eq!(overrides.country.as_deref(), Some("BR"));
        assert_eq!(overrides.currency.as_deref(), Some("eur"));
        assert_eq!(overrides.accept_language, None);
        assert_eq!(overrides.client_ip, None);
    }

    #[test]
    fn test_headers_and_forwarded_address() {
        let parts = parts(
            "/api/v1/currency",
            &[
                ("accept-language", "pt-BR,pt;q=0.9"),
                ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
            ],
        );
        let overrides = request_overrides(&parts);

        assert_eq!(overrides.accept_language.as_deref(), Some("pt-BR,pt;q=0.9"));
        assert_eq!(overrides.client_ip, Some("203.0.113.9".parse().unwrap()));
        assert_eq!(overrides.preferred_language().as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_peer_address_when_not_forwarded() {
        let mut parts = parts("/api/v1/currency", &[("x-forwarded-for", "unknown")]);
        let peer: SocketAddr = "198.51.100.4:52000".parse().unwrap();
        parts.extensions.insert(ConnectInfo(peer));

        assert_eq!(request_overrides(&parts).client_ip, Some(peer.ip()));
    }

    #[test]
    fn test_unrelated_query_parameters_ignored() {
        let parts = parts("/api/v1/prices/format?usd=10&utm_source=mail", &[]);
        assert_eq!(request_overrides(&parts), RequestOverrides::default());
    }
}
