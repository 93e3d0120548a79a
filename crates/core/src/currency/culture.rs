//! Culture resolution from country codes and `Accept-Language` headers.

/// Culture used for any country without an explicit mapping.
pub const FALLBACK_CULTURE: &str = "en-US";

/// Maps a two-letter country code to its culture identifier.
///
/// Unlisted countries map to [`FALLBACK_CULTURE`].
#[must_use]
pub fn culture_for_country(country_code: &str) -> &'static str {
    match country_code.trim().to_ascii_uppercase().as_str() {
        "BR" => "pt-BR",
        "ES" => "es-ES",
        "DE" => "de-DE",
        "CN" => "zh-CN",
        "JP" => "ja-JP",
        "US" => "en-US",
        "CO" => "es-CO",
        _ => FALLBACK_CULTURE,
    }
}

/// Extracts the first preferred locale from an `Accept-Language` value.
///
/// `"de-DE,de;q=0.9,en;q=0.8"` yields `"de-DE"`. The token is not
/// validated as a well-formed locale.
#[must_use]
pub fn first_accepted_language(header: Option<&str>) -> Option<String> {
    let header = header?.trim();
    if header.is_empty() {
        return None;
    }

    let first = header.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    if tag.is_empty() {
        return None;
    }

    Some(tag.to_string())
}
