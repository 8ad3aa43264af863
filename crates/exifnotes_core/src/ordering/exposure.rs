//! Exposure value parsing for sort keys.
//!
//! Shutter and aperture values are stored as display strings. These helpers
//! only extract a comparable number; they never rewrite the stored text.

use once_cell::sync::Lazy;
use regex::Regex;

static SHUTTER_FRACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:[.,]\d+)?)\s*/\s*(\d+(?:[.,]\d+)?)$").expect("valid fraction regex")
});
static SHUTTER_SECONDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\d+(?:[.,]\d+)?)\s*(?:"|″|''|s|sec)?$"#).expect("valid seconds regex")
});
static APERTURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:f)?\s*/?\s*(\d+(?:[.,]\d+)?)$").expect("valid aperture regex"));

/// Exposure time in seconds.
///
/// Accepts fractions (`1/250`), whole or decimal seconds with an optional
/// `"`, `″` or `s` suffix (`2`, `1"`, `0.5s`). Bulb, empty and unknown
/// markers return `None`.
pub fn shutter_seconds(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if let Some(captures) = SHUTTER_FRACTION_RE.captures(trimmed) {
        let numerator = parse_decimal(&captures[1])?;
        let denominator = parse_decimal(&captures[2])?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }
    if let Some(captures) = SHUTTER_SECONDS_RE.captures(trimmed) {
        return parse_decimal(&captures[1]);
    }
    None
}

/// F-number parsed from an aperture display string (`2.8`, `f/2.8`, `F2,8`).
pub fn f_number(value: &str) -> Option<f64> {
    let captures = APERTURE_RE.captures(value.trim())?;
    parse_decimal(&captures[1]).filter(|number| *number > 0.0)
}

fn parse_decimal(text: &str) -> Option<f64> {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
