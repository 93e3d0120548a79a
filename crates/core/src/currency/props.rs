//! Property-based tests for price formatting and rate caching.
//!
//! - Property 1: Rendered prices read back as the rounded amount
//! - Property 2: Conversion respects the culture's fraction digits
//! - Property 3: The cached rate is always positive
//! - Property 4: Accept-Language yields a single bare token

use chrono::{TimeDelta, Utc};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::culture::first_accepted_language;
use super::format::{CurrencyFormat, convert_amount, format_currency};
use super::rate::RateCache;
use super::region::known_cultures;

/// Strategy for signed amounts with cents (-1,000,000.00 to 1,000,000.00).
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for positive rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy for rates that may be zero or negative.
fn any_rate() -> impl Strategy<Value = Decimal> {
    (-10_000i64..10_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy picking one of the cultures with region data.
fn culture() -> impl Strategy<Value = &'static str> {
    let cultures: Vec<&'static str> = known_cultures().collect();
    prop::sample::select(cultures)
}

/// Strips symbol and separators from a rendered price and parses the number.
fn read_back(rendered: &str, format: &CurrencyFormat) -> Decimal {
    let conventions = &format.conventions;
    let negative = rendered.starts_with('-');
    let digits: String = rendered
        .replace(format.symbol.as_str(), "")
        .chars()
        .filter(|c| *c != '-' && *c != '\u{a0}' && *c != conventions.group_separator)
        .map(|c| if c == conventions.decimal_separator { '.' } else { c })
        .collect();
    let value: Decimal = digits.parse().unwrap_or(Decimal::MIN);
    if negative { -value } else { value }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: formatting loses nothing beyond the fraction digits.
    #[test]
    fn prop_rendered_price_reads_back(
        amount in any_amount(),
        culture in culture(),
    ) {
        let format = CurrencyFormat::for_culture(culture, "¤", "en-US");
        let rendered = format_currency(amount, &format);
        let expected = amount.round_dp_with_strategy(
            format.conventions.fraction_digits,
            RoundingStrategy::MidpointNearestEven,
        );
        prop_assert_eq!(
            read_back(&rendered, &format), expected,
            "{} rendered as {}", amount, rendered
        );
        prop_assert!(rendered.contains('¤'));
    }

    /// Property 2: converted amounts never carry more digits than the culture shows.
    #[test]
    fn prop_convert_respects_fraction_digits(
        amount in any_amount(),
        rate in positive_rate(),
        culture in culture(),
    ) {
        let format = CurrencyFormat::for_culture(culture, "$", "en-US");
        let digits = format.conventions.fraction_digits;
        let result = convert_amount(amount, rate, digits);
        prop_assert!(result.scale() <= digits, "{} has more than {} digits", result, digits);
    }

    /// Property 3: no sequence of accepted or rejected rates leaves a non-positive rate.
    #[test]
    fn prop_cached_rate_stays_positive(
        rates in prop::collection::vec(any_rate(), 1..20),
    ) {
        let mut cache = RateCache::new();
        let now = Utc::now();
        for rate in rates {
            let accepted = cache.accept(rate, now);
            prop_assert_eq!(accepted, rate > Decimal::ZERO);
            prop_assert!(cache.usd_to_local() > Decimal::ZERO);
        }
        prop_assert!(cache.last_rate_at().is_none() || cache.is_fresh(now, TimeDelta::seconds(1)));
    }

    /// Property 4: the chosen language never carries list or quality syntax.
    #[test]
    fn prop_accept_language_token_is_bare(header in "[a-zA-Z;=,.0-9 -]{0,40}") {
        if let Some(tag) = first_accepted_language(Some(&header)) {
            prop_assert!(!tag.is_empty());
            prop_assert!(!tag.contains(','));
            prop_assert!(!tag.contains(';'));
            prop_assert_eq!(tag.trim(), tag.as_str());
        }
    }
}
