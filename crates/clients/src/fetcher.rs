//! reqwest-backed JSON fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use localprice_core::currency::{CurrencyError, JsonFetcher};

const USER_AGENT: &str = concat!("localprice/", env!("CARGO_PKG_VERSION"));

/// Client-wide ceiling; callers pass a tighter per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared HTTP client for provider calls.
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Transport`] if the TLS backend fails to initialize.
    pub fn new() -> Result<Self, CurrencyError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CurrencyError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, CurrencyError> {
        debug!(url, timeout_ms = timeout.as_millis(), "provider request");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_error(url, timeout, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurrencyError::transport(format!("{url} returned {status}")));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                timed_out(url, timeout)
            } else {
                CurrencyError::invalid_response(format!("{url}: {e}"))
            }
        })
    }
}

fn map_error(url: &str, timeout: Duration, err: &reqwest::Error) -> CurrencyError {
    if err.is_timeout() {
        timed_out(url, timeout)
    } else {
        CurrencyError::transport(format!("{url}: {err}"))
    }
}

fn timed_out(url: &str, timeout: Duration) -> CurrencyError {
    CurrencyError::Timeout {
        url: url.to_string(),
        millis: timeout.as_millis(),
    }
}
