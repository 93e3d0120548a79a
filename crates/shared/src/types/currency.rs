//! ISO 4217 currency codes.
//!
//! Codes are stored uppercase no matter how they arrive (query strings,
//! provider payloads, configuration).

use serde::{Deserialize, Serialize};

/// An uppercase ISO 4217 currency code such as `USD` or `BRL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// US Dollar, the base every exchange rate is quoted against.
    pub const USD: &'static str = "USD";

    /// Creates a code from any casing, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is not three ASCII letters.
    pub fn new(code: &str) -> Result<Self, String> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Invalid currency code: {code}"));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The US Dollar code.
    #[must_use]
    pub fn usd() -> Self {
        Self(Self::USD.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the US Dollar.
    #[must_use]
    pub fn is_usd(&self) -> bool {
        self.0 == Self::USD
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
