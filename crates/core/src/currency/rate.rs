//! Cached USD→local exchange rate.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

/// Last accepted USD→local rate and when it was fetched.
///
/// The rate is always positive; [`RateCache::accept`] refuses anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCache {
    usd_to_local: Decimal,
    last_rate_at: Option<DateTime<Utc>>,
}

impl RateCache {
    /// Creates a cache holding the neutral 1.0 rate, never fetched.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            usd_to_local: Decimal::ONE,
            last_rate_at: None,
        }
    }

    /// Current multiplier from USD to the local currency.
    #[must_use]
    pub const fn usd_to_local(&self) -> Decimal {
        self.usd_to_local
    }

    /// Time of the last accepted fetch; `None` before the first one.
    #[must_use]
    pub const fn last_rate_at(&self) -> Option<DateTime<Utc>> {
        self.last_rate_at
    }

    /// Returns true if the last fetch is younger than `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.last_rate_at.is_some_and(|at| now - at < ttl)
    }

    /// Stores `rate` fetched at `now` if it is positive.
    ///
    /// Returns false and leaves the cache untouched otherwise.
    pub fn accept(&mut self, rate: Decimal, now: DateTime<Utc>) -> bool {
        if rate <= Decimal::ZERO {
            return false;
        }
        self.usd_to_local = rate;
        self.last_rate_at = Some(now);
        true
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn twelve_hours() -> TimeDelta {
        TimeDelta::hours(12)
    }

    #[test]
    fn test_new_cache_is_neutral_and_stale() {
        let cache = RateCache::new();
        assert_eq!(cache.usd_to_local(), Decimal::ONE);
        assert_eq!(cache.last_rate_at(), None);
        assert!(!cache.is_fresh(Utc::now(), twelve_hours()));
    }

    #[test]
    fn test_accept_positive_rate() {
        let mut cache = RateCache::new();
        let now = Utc::now();
        assert!(cache.accept(dec!(5.12), now));
        assert_eq!(cache.usd_to_local(), dec!(5.12));
        assert_eq!(cache.last_rate_at(), Some(now));
    }

    #[test]
    fn test_reject_zero_and_negative() {
        let mut cache = RateCache::new();
        let now = Utc::now();
        assert!(cache.accept(dec!(4100), now));

        assert!(!cache.accept(Decimal::ZERO, now + TimeDelta::hours(1)));
        assert!(!cache.accept(dec!(-3.5), now + TimeDelta::hours(2)));
        assert_eq!(cache.usd_to_local(), dec!(4100));
        assert_eq!(cache.last_rate_at(), Some(now));
    }

    #[test]
    fn test_freshness_window() {
        let mut cache = RateCache::new();
        let fetched = Utc::now();
        cache.accept(dec!(0.92), fetched);

        assert!(cache.is_fresh(fetched, twelve_hours()));
        assert!(cache.is_fresh(fetched + TimeDelta::hours(11), twelve_hours()));
        assert!(!cache.is_fresh(fetched + twelve_hours(), twelve_hours()));
        assert!(!cache.is_fresh(fetched + TimeDelta::days(2), twelve_hours()));
    }
}
