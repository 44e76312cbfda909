//! Brazilian currency and number handling
//!
//! Client data arrives with numbers in whatever shape the upstream CRM held
//! them: bare JSON numbers, localized strings ("R$ 1.234,56"), or garbage.
//! Everything funnels through [`resolve`] so the engine itself only ever
//! sees [`Decimal`] values.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A numeric field as supplied by the client: a bare number or a string.
///
/// `Text` is listed first so that any JSON string lands there and goes
/// through the lenient parser; a string that fails to parse falls back to
/// the field default instead of aborting deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawNumber {
    Text(String),
    Number(#[schemars(with = "f64")] Decimal),
}

impl RawNumber {
    /// Normalized decimal value, or `default` when the text is unparseable.
    pub fn to_decimal(&self, default: Decimal) -> Decimal {
        match self {
            RawNumber::Number(n) => *n,
            RawNumber::Text(s) => parse_brl(s).unwrap_or(default),
        }
    }
}

/// The single gate for untrusted numeric input: absent, empty and
/// malformed values all collapse to the supplied default.
pub fn resolve(value: Option<&RawNumber>, default: Decimal) -> Decimal {
    match value {
        Some(raw) => raw.to_decimal(default),
        None => default,
    }
}

/// Parse a number in Brazilian notation.
///
/// Strings carrying the currency marker or a decimal comma are read as
/// localized ("R$ 1.234,56" -> 1234.56, dots are thousands separators).
/// Anything else is read as a plain decimal, so "0.92" stays 0.92.
pub fn parse_brl(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("R$") || trimmed.contains(',') {
        let cleaned: String = trimmed
            .replace("R$", "")
            .replace('.', "")
            .replace(',', ".")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        cleaned.parse().ok()
    } else {
        trimmed.parse().ok()
    }
}

/// Render a currency value: "R$ " marker, dot thousands, comma decimals,
/// always two places. The sign goes outside the marker: "-R$ 1.234,50".
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_sign_negative() {
        format!("-R$ {}", localize(rounded.abs()))
    } else {
        format!("R$ {}", localize(rounded))
    }
}

/// Render an energy quantity as a grouped integer: 18000 -> "18.000".
pub fn format_kwh(value: Decimal) -> String {
    group_thousands(&format!("{:.0}", value.round_dp(0)))
}

/// Render a plain number with a decimal comma, trailing zeros trimmed:
/// 3.50 -> "3,5", 10 -> "10".
pub fn format_plain(value: Decimal) -> String {
    value.normalize().to_string().replace('.', ",")
}

fn localize(value: Decimal) -> String {
    let text = format!("{:.2}", value);
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{},{}", group_thousands(whole), frac)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && c.is_ascii_digit() && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
