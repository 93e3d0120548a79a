//! Region data: default currency and number conventions per culture.

use super::error::CurrencyError;

/// Where the currency symbol sits relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1.00`
    Prefix,
    /// `1,00 €`
    Suffix,
}

/// Number and currency layout for a culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberConventions {
    /// Separator between integer and fraction digits.
    pub decimal_separator: char,
    /// Separator between groups of three integer digits.
    pub group_separator: char,
    /// Digits shown after the decimal separator.
    pub fraction_digits: u32,
    /// Symbol placement.
    pub symbol_position: SymbolPosition,
    /// Whether a no-break space separates symbol and number.
    pub symbol_spaced: bool,
}

impl NumberConventions {
    /// en-US layout, used when nothing better is known.
    pub const INVARIANT: Self = Self {
        decimal_separator: '.',
        group_separator: ',',
        fraction_digits: 2,
        symbol_position: SymbolPosition::Prefix,
        symbol_spaced: false,
    };
}

/// Region data for a single culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionInfo {
    /// Canonical culture identifier, e.g. `pt-BR`.
    pub culture: &'static str,
    /// ISO 4217 code of the region's currency.
    pub currency_code: &'static str,
    /// Native currency symbol.
    pub currency_symbol: &'static str,
    /// Number layout.
    pub conventions: NumberConventions,
}

#[allow(clippy::too_many_arguments)]
const fn region(
    culture: &'static str,
    currency_code: &'static str,
    currency_symbol: &'static str,
    decimal_separator: char,
    group_separator: char,
    fraction_digits: u32,
    symbol_position: SymbolPosition,
    symbol_spaced: bool,
) -> RegionInfo {
    RegionInfo {
        culture,
        currency_code,
        currency_symbol,
        conventions: NumberConventions {
            decimal_separator,
            group_separator,
            fraction_digits,
            symbol_position,
            symbol_spaced,
        },
    }
}

use SymbolPosition::{Prefix, Suffix};

static REGIONS: &[RegionInfo] = &[
    region("en-US", "USD", "$", '.', ',', 2, Prefix, false),
    region("es-CO", "COP", "$", ',', '.', 2, Prefix, true),
    region("pt-BR", "BRL", "R$", ',', '.', 2, Prefix, true),
    region("es-ES", "EUR", "€", ',', '.', 2, Suffix, true),
    region("de-DE", "EUR", "€", ',', '.', 2, Suffix, true),
    region("zh-CN", "CNY", "¥", '.', ',', 2, Prefix, false),
    region("ja-JP", "JPY", "¥", '.', ',', 0, Prefix, false),
    region("fr-FR", "EUR", "€", ',', '\u{202f}', 2, Suffix, true),
    region("it-IT", "EUR", "€", ',', '.', 2, Suffix, true),
    region("en-GB", "GBP", "£", '.', ',', 2, Prefix, false),
    region("es-MX", "MXN", "$", '.', ',', 2, Prefix, false),
];

/// Looks up region data for a culture identifier.
///
/// Matching ignores ASCII case and accepts `_` in place of `-`.
///
/// # Errors
///
/// Returns [`CurrencyError::UnknownCulture`] when the culture is not in the table.
pub fn region_for(culture: &str) -> Result<&'static RegionInfo, CurrencyError> {
    let wanted = culture.trim().replace('_', "-");
    REGIONS
        .iter()
        .find(|r| r.culture.eq_ignore_ascii_case(&wanted))
        .ok_or_else(|| CurrencyError::UnknownCulture(culture.to_string()))
}

/// Returns every culture with region data.
pub fn known_cultures() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|r| r.culture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::culture::culture_for_country;
    use rstest::rstest;

    #[rstest]
    #[case("pt-BR", "BRL", "R$")]
    #[case("de-DE", "EUR", "€")]
    #[case("es-CO", "COP", "$")]
    #[case("ja-JP", "JPY", "¥")]
    #[case("en-US", "USD", "$")]
    fn test_region_currency(#[case] culture: &str, #[case] code: &str, #[case] symbol: &str) {
        let info = region_for(culture).unwrap();
        assert_eq!(info.currency_code, code);
        assert_eq!(info.currency_symbol, symbol);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(region_for("PT-br").unwrap().culture, "pt-BR");
        assert_eq!(region_for("de_DE").unwrap().culture, "de-DE");
    }

    #[test]
    fn test_unknown_culture() {
        let err = region_for("xx-YY").unwrap_err();
        assert!(matches!(err, CurrencyError::UnknownCulture(ref c) if c == "xx-YY"));
        assert!(region_for("").is_err());
        assert!(region_for("de").is_err());
    }

    #[test]
    fn test_every_mapped_country_has_region_data() {
        for country in ["BR", "ES", "DE", "CN", "JP", "US", "CO", "ZZ"] {
            let culture = culture_for_country(country);
            assert!(region_for(culture).is_ok(), "{culture} missing");
        }
    }

    #[test]
    fn test_known_cultures_are_unique() {
        let mut cultures: Vec<_> = known_cultures().collect();
        let total = cultures.len();
        cultures.sort_unstable();
        cultures.dedup();
        assert_eq!(cultures.len(), total);
    }
}
