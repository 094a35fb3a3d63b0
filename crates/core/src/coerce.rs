//! Lenient value coercion
//!
//! Field values produced outside the pattern extractor (LLM replies, stored
//! records) arrive in loose shapes: `"₹25,000"`, `"5.9%"`, `"$0.25/mile"`,
//! `"12000 miles"`. The helpers here turn those into typed values, and
//! degrade to `None` instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const PREFIXES: &[&str] = &["rs.", "rs", "inr", "usd", "₹", "$"];

const SUFFIXES: &[&str] = &[
    "per month",
    "/month",
    "months",
    "month",
    "per mile",
    "/mile",
    "miles",
    "mi",
    "%",
];

/// Parse a loosely formatted number
///
/// Accepts an optional currency prefix, thousands separators and a unit
/// suffix. Returns `None` for anything else.
pub fn parse_number(raw: &str) -> Option<f64> {
    let mut s = raw.trim().to_lowercase();

    for prefix in PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start().to_string();
            break;
        }
    }
    for suffix in SUFFIXES {
        if let Some(rest) = s.strip_suffix(suffix) {
            s = rest.trim_end().to_string();
            break;
        }
    }

    let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric view of a JSON value
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Whole, non-negative number that fits in `u32`
pub fn whole_from_value(value: &Value) -> Option<u32> {
    number_from_value(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn skipped<T>(field: &'static str, value: &Value) -> Option<T> {
    if !value.is_null() {
        tracing::debug!(field, value = %value, "Coercion skipped, field left empty");
    }
    None
}

/// `Option<f64>` from a number or numeric string
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).or_else(|| skipped("number", &value)))
}

/// `Option<u32>` from a whole number or numeric string
pub fn whole<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(whole_from_value(&value).or_else(|| skipped("whole", &value)))
}

/// Model year as `Option<u16>`
pub fn year<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(whole_from_value(&value)
        .and_then(|y| u16::try_from(y).ok())
        .or_else(|| skipped("year", &value)))
}

/// Non-empty trimmed text
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// List of strings; a bare string becomes a one-element list
pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Array(items) => items.iter().filter_map(text_from_value).collect(),
        other => text_from_value(other).into_iter().collect(),
    })
}

/// Any deserializable type; malformed input becomes the default value
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            tracing::debug!(value = %value, error = %e, "Coercion skipped, using default");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number_formats() {
        assert_eq!(parse_number("₹25,000"), Some(25000.0));
        assert_eq!(parse_number("Rs. 1500"), Some(1500.0));
        assert_eq!(parse_number("$0.25/mile"), Some(0.25));
        assert_eq!(parse_number("5.9%"), Some(5.9));
        assert_eq!(parse_number("12,000 miles"), Some(12000.0));
        assert_eq!(parse_number(" 36 months "), Some(36.0));
        assert_eq!(parse_number("INR 450"), Some(450.0));
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("two months of payments"), None);
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_whole_rejects_fractions() {
        assert_eq!(whole_from_value(&json!(36)), Some(36));
        assert_eq!(whole_from_value(&json!("36")), Some(36));
        assert_eq!(whole_from_value(&json!(36.5)), None);
        assert_eq!(whole_from_value(&json!(-1)), None);
    }

    #[test]
    fn test_text_from_value() {
        assert_eq!(text_from_value(&json!("  Toyota ")), Some("Toyota".to_string()));
        assert_eq!(text_from_value(&json!("")), None);
        assert_eq!(text_from_value(&json!("null")), None);
        assert_eq!(text_from_value(&json!(2023)), Some("2023".to_string()));
        assert_eq!(text_from_value(&json!({"a": 1})), None);
    }
}
