//! Accessor fallbacks over raw JSON responses.
//!
//! The Polymarket APIs have shipped several field-name generations
//! (`amountUSD` vs `amount_usd` vs `valueUSD`), so every record parser
//! walks an ordered list of candidate keys and takes the first non-null
//! value instead of binding to a rigid struct.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

/// First non-null value among the candidate keys.
pub fn first_value<'a>(data: &'a JsonValue, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|key| data.get(key))
        .find(|value| !value.is_null())
}

/// First candidate key holding a string.
pub fn first_str<'a>(data: &'a JsonValue, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| data.get(key)?.as_str())
}

/// First candidate key holding a string or a number, rendered as a string.
pub fn first_string(data: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = data.get(key)?;
        match value {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}

/// First candidate key holding a number or a numeric string.
pub fn first_f64(data: &JsonValue, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let value = data.get(key)?;
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    })
}

/// First candidate key holding an unsigned integer or integer string.
///
/// A present zero wins over later keys; only null/absent keys fall through.
pub fn first_u32(data: &JsonValue, keys: &[&str]) -> Option<u32> {
    first_value(data, keys).and_then(|value| {
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .and_then(|n| u32::try_from(n).ok())
    })
}

/// True when any candidate key holds a true boolean.
pub fn any_true(data: &JsonValue, keys: &[&str]) -> bool {
    keys.iter()
        .any(|key| data.get(key).and_then(JsonValue::as_bool).unwrap_or(false))
}

/// Parses a timestamp value as Unix seconds (integer or float) or as an
/// ISO-8601 / date-only string, always in UTC.
pub fn parse_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    if let Some(secs) = value.as_i64() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Some(secs) = value.as_f64() {
        return DateTime::from_timestamp(secs as i64, 0);
    }

    let raw = value.as_str()?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
