//! Price conversion and localized currency rendering.
//!
//! CRITICAL: amounts stay `Decimal` end to end.
//! - Convert with the cached USD rate
//! - Round to the culture's fraction digits with banker's rounding
//! - Render with the culture's separators but the resolved symbol

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::region::{NumberConventions, SymbolPosition, region_for};

const NO_BREAK_SPACE: char = '\u{a0}';

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
/// Products beyond the `Decimal` range saturate to `Decimal::MAX` or
/// `Decimal::MIN`.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    checked_convert_amount(amount, rate, decimal_places).unwrap_or(
        if amount.is_sign_negative() == rate.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        },
    )
}

/// Like [`convert_amount`], but `None` when the product overflows.
#[must_use]
pub fn checked_convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Option<Decimal> {
    amount
        .checked_mul(rate)
        .map(|converted| {
            converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
        })
}

/// Locale conventions plus the symbol to show in their place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// Separators, fraction digits and symbol placement.
    pub conventions: NumberConventions,
    /// Symbol rendered instead of the culture's native one.
    pub symbol: String,
}

impl CurrencyFormat {
    /// Creates a format from explicit conventions and symbol.
    #[must_use]
    pub fn new(conventions: NumberConventions, symbol: impl Into<String>) -> Self {
        Self {
            conventions,
            symbol: symbol.into(),
        }
    }

    /// Builds the format for `culture`, overriding its symbol.
    ///
    /// Unknown cultures use `fallback_culture`'s conventions, then en-US.
    #[must_use]
    pub fn for_culture(culture: &str, symbol: impl Into<String>, fallback_culture: &str) -> Self {
        let conventions = region_for(culture)
            .or_else(|_| region_for(fallback_culture))
            .map_or(NumberConventions::INVARIANT, |r| r.conventions);
        Self::new(conventions, symbol)
    }
}

/// Renders `amount` under `format`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use localprice_core::currency::{CurrencyFormat, NumberConventions, format_currency};
///
/// let format = CurrencyFormat::new(NumberConventions::INVARIANT, "$");
/// assert_eq!(format_currency(dec!(1234.5), &format), "$1,234.50");
/// ```
#[must_use]
pub fn format_currency(amount: Decimal, format: &CurrencyFormat) -> String {
    let conventions = &format.conventions;
    let rounded = amount.round_dp_with_strategy(
        conventions.fraction_digits,
        RoundingStrategy::MidpointNearestEven,
    );
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.*}", conventions.fraction_digits as usize, rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut number = group_digits(integer, conventions.group_separator);
    if !fraction.is_empty() {
        number.push(conventions.decimal_separator);
        number.push_str(fraction);
    }

    let mut out = String::with_capacity(number.len() + format.symbol.len() + 2);
    if negative {
        out.push('-');
    }

    let spacer = conventions.symbol_spaced && !format.symbol.is_empty();
    match conventions.symbol_position {
        SymbolPosition::Prefix => {
            out.push_str(&format.symbol);
            if spacer {
                out.push(NO_BREAK_SPACE);
            }
            out.push_str(&number);
        }
        SymbolPosition::Suffix => {
            out.push_str(&number);
            if spacer {
                out.push(NO_BREAK_SPACE);
            }
            out.push_str(&format.symbol);
        }
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
