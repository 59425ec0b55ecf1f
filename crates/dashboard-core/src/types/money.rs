//! Lenient decimal parsing for monetary fields.
//!
//! The remote service sends amounts as plain numbers, numeric strings or
//! currency-prefixed strings such as `"$65,000.10"`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// Parse a possibly currency-prefixed amount.
pub fn parse_money(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .trim_start_matches(|c: char| c == '$' || c.is_whitespace())
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

/// Serde adapter: `#[serde(with = "money")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(text) => text,
        RawAmount::Number(number) => number.to_string(),
    };
    parse_money(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {raw:?}")))
}

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}
