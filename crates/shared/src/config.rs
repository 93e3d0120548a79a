//! Application configuration management.

use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Locale and currency resolution settings.
    #[serde(default)]
    pub currency: CurrencySettings,
    /// Upstream provider endpoints.
    #[serde(default)]
    pub providers: ProviderSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Fallback values and timing for currency resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencySettings {
    /// Culture used when nothing else resolves.
    #[serde(default = "default_culture")]
    pub default_culture: String,
    /// Currency code used before resolution.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Currency symbol used before resolution.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    /// How long a fetched rate stays fresh, in seconds.
    #[serde(default = "default_rate_ttl")]
    pub rate_ttl_secs: u64,
    /// Upper bound for the geolocation call, in milliseconds.
    #[serde(default = "default_geo_timeout")]
    pub geo_timeout_ms: u64,
    /// Upper bound for the exchange-rate call, in milliseconds.
    #[serde(default = "default_rate_timeout")]
    pub rate_timeout_ms: u64,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            default_culture: default_culture(),
            default_currency: default_currency(),
            default_symbol: default_symbol(),
            rate_ttl_secs: default_rate_ttl(),
            geo_timeout_ms: default_geo_timeout(),
            rate_timeout_ms: default_rate_timeout(),
        }
    }
}

fn default_culture() -> String {
    "es-CO".to_string()
}

fn default_currency() -> String {
    "COP".to_string()
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_rate_ttl() -> u64 {
    43_200 // 12 hours
}

fn default_geo_timeout() -> u64 {
    3_000
}

fn default_rate_timeout() -> u64 {
    5_000
}

/// Upstream provider endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the IP geolocation service.
    ///
    /// Requests go to `{geo_url}/json/` or `{geo_url}/{ip}/json/`.
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
    /// Exchange-rate endpoint returning `rates` against a USD base.
    #[serde(default = "default_rates_url")]
    pub rates_url: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            geo_url: default_geo_url(),
            rates_url: default_rates_url(),
        }
    }
}

fn default_geo_url() -> String {
    "https://ipapi.co".to_string()
}

fn default_rates_url() -> String {
    "https://open.er-api.com/v6/latest/USD".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Configuration`] if a source cannot be read
    /// or a value has the wrong type.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LOCALPRICE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "LOCALPRICE__SERVER__PORT",
                "LOCALPRICE__CURRENCY__DEFAULT_CULTURE",
                "RUN_MODE",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.currency.default_culture, "es-CO");
                assert_eq!(config.currency.default_currency, "COP");
                assert_eq!(config.currency.default_symbol, "$");
                assert_eq!(config.currency.rate_ttl_secs, 43_200);
                assert_eq!(config.currency.geo_timeout_ms, 3_000);
                assert_eq!(config.providers.geo_url, "https://ipapi.co");
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("LOCALPRICE__SERVER__PORT", Some("9090")),
                ("LOCALPRICE__CURRENCY__DEFAULT_CULTURE", Some("pt-BR")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.currency.default_culture, "pt-BR");
                // untouched sections keep their defaults
                assert_eq!(config.currency.default_currency, "COP");
            },
        );
    }

    #[test]
    fn test_malformed_value_is_configuration_error() {
        temp_env::with_var("LOCALPRICE__SERVER__PORT", Some("eighty"), || {
            let err = AppConfig::load().unwrap_err();
            assert!(matches!(err, crate::AppError::Configuration(_)));
        });
    }
}
