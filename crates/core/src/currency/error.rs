//! Currency resolution error types.
//!
//! None of these reach callers of `CurrencyState`; they flow between the
//! collaborators and the orchestrator, which logs them and falls back.

use thiserror::Error;

/// Errors raised while resolving locale, currency, or exchange rate.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// Culture identifier has no region data.
    #[error("unknown culture: {0}")]
    UnknownCulture(String),

    /// External call exceeded its time budget.
    #[error("request to {url} timed out after {millis} ms")]
    Timeout {
        /// URL that was requested.
        url: String,
        /// Budget that elapsed.
        millis: u128,
    },

    /// Network or HTTP status failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// Body could not be decoded into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate payload did not carry a usable rate for the currency.
    #[error("no usable rate for {0}")]
    RateUnavailable(String),
}

impl CurrencyError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

impl From<serde_json::Error> for CurrencyError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
