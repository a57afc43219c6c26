//! Tolerant field readers for documents written by other clients.
//!
//! Documents arrive from mobile apps and older dashboards, so numbers may be
//! JSON numbers or numeric strings and timestamps may be RFC 3339 strings,
//! epoch milliseconds, or `{seconds, nanoseconds}` objects. A malformed value
//! reads as absent rather than failing the whole document.
//!
//! Use with `#[serde(default, deserialize_with = "...")]`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Read a decimal from a JSON value.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            let text = n.to_string();
            text.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&text).ok())
        }
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(trimmed).ok())
        }
        _ => None,
    }
}

/// Read a timestamp from a JSON value.
#[must_use]
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.trim().parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(|f| f.round().to_i64()))
            .and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos)
        }
        _ => None,
    }
}

/// Read a boolean, accepting `"true"` / `"false"` strings.
#[must_use]
pub fn bool_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Read a string, accepting numbers (phone numbers are often stored as such).
#[must_use]
pub fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a non-negative count.
#[must_use]
pub fn count_from_value(value: &Value) -> Option<u32> {
    decimal_from_value(value)
        .filter(|d| !d.is_sign_negative())
        .and_then(|d| d.trunc().to_u32())
}

/// Read an integer (may be negative).
#[must_use]
pub fn integer_from_value(value: &Value) -> Option<i64> {
    decimal_from_value(value).and_then(|d| d.trunc().to_i64())
}

/// Read a list of strings from an array, or from a comma-separated string.
#[must_use]
pub fn string_list_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(string_from_value)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => split_list(s),
        _ => Vec::new(),
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

// =============================================================================
// serde adapters
// =============================================================================

/// Lenient `Option<Decimal>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    Ok(decimal_from_value(&Value::deserialize(d)?))
}

/// Lenient `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(timestamp_from_value(&Value::deserialize(d)?))
}

/// Lenient `Option<bool>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(bool_from_value(&Value::deserialize(d)?))
}

/// Lenient `Option<String>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(string_from_value(&Value::deserialize(d)?))
}

/// Lenient `Option<u32>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(count_from_value(&Value::deserialize(d)?))
}

/// Lenient `Option<i64>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(integer_from_value(&Value::deserialize(d)?))
}

/// Lenient `Vec<String>`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(string_list_from_value(&Value::deserialize(d)?))
}

/// Lenient sequence: a non-array value reads as empty.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn items<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Array(values) => Ok(values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// A decimal as a JSON number: integral values stay integers.
#[must_use]
pub fn number_value(value: Decimal) -> Value {
    if value.fract().is_zero()
        && let Some(i) = value.to_i64()
    {
        return Value::from(i);
    }
    value
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// Write a decimal as a JSON number, the way documents store money.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize_decimal<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    number_value(*value).serialize(s)
}

/// Write an optional decimal as a JSON number or `null`.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::ref_option)]
pub fn serialize_decimal_opt<S: Serializer>(
    value: &Option<Decimal>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serialize_decimal(d, s),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decimal_from_numbers_and_strings() {
        assert_eq!(decimal_from_value(&json!(149)), Some(Decimal::from(149)));
        assert_eq!(decimal_from_value(&json!(149.5)), Some(Decimal::new(1495, 1)));
        assert_eq!(decimal_from_value(&json!(" 30.25 ")), Some(Decimal::new(3025, 2)));
        assert_eq!(decimal_from_value(&json!("abc")), None);
        assert_eq!(decimal_from_value(&json!(null)), None);
        assert_eq!(decimal_from_value(&json!(true)), None);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(
            timestamp_from_value(&json!("2026-03-01T10:00:00Z")),
            Some(expected)
        );
        assert_eq!(
            timestamp_from_value(&json!(expected.timestamp_millis())),
            Some(expected)
        );
        assert_eq!(
            timestamp_from_value(&json!({"seconds": expected.timestamp(), "nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(
            timestamp_from_value(&json!({"_seconds": expected.timestamp(), "_nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(timestamp_from_value(&json!("yesterday")), None);
    }

    #[test]
    fn test_bool_and_string() {
        assert_eq!(bool_from_value(&json!("FALSE")), Some(false));
        assert_eq!(bool_from_value(&json!(1)), None);
        assert_eq!(string_from_value(&json!(9_876_543_210_u64)), Some("9876543210".to_string()));
    }

    #[test]
    fn test_counts() {
        assert_eq!(count_from_value(&json!("3")), Some(3));
        assert_eq!(count_from_value(&json!(-1)), None);
        assert_eq!(integer_from_value(&json!(-4)), Some(-4));
    }

    #[test]
    fn test_string_lists() {
        assert_eq!(
            string_list_from_value(&json!(["10001", 10002, " "])),
            vec!["10001", "10002"]
        );
        assert_eq!(
            string_list_from_value(&json!("10001, 10002,,10003 ")),
            vec!["10001", "10002", "10003"]
        );
    }

    #[test]
    fn test_serialize_decimal_as_number() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize_decimal")]
            price: Decimal,
        }

        let whole = serde_json::to_value(Wrapper { price: Decimal::from(30) }).unwrap();
        assert_eq!(whole, json!({"price": 30}));

        let fractional = serde_json::to_value(Wrapper { price: Decimal::new(1495, 1) }).unwrap();
        assert_eq!(fractional, json!({"price": 149.5}));
    }
}
