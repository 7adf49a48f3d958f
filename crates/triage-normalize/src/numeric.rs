//! Numeric normalization for vital-sign fields.
//!
//! Values arrive as JSON numbers, unit-suffixed strings ("98.6°F",
//! "72 years"), blanks, or garbage. Everything resolves to a finite
//! `f64` or `None`; NaN and infinities never leave this module.

use serde_json::Value;

/// Parse a string value to a finite number.
///
/// Handles the shapes seen in the patient feed:
/// - Plain numbers: "120", "-4.5", "+7"
/// - Unit suffixes and symbols: "98.6°F", "72 years", "101.2 F"
/// - Whitespace: "  99.1  "
///
/// A blank string is absent, never zero. Every character other than an
/// ASCII digit, `.`, `+` or `-` is stripped before parsing.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Normalize a raw JSON field to a finite number.
///
/// Numbers pass through unchanged, strings go through [`parse_numeric`],
/// and every other JSON type (null, bool, array, object) is absent.
pub fn normalize_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => parse_numeric(text),
        _ => None,
    }
}
