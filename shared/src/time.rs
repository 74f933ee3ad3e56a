//! Timestamp helpers.
//!
//! Snapshot files mix second- and millisecond-scale epochs. Anything below
//! 10^12 is treated as seconds and rescaled; everything the API emits is ms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Epoch values below this are seconds.
pub const MILLIS_THRESHOLD: f64 = 1e12;

/// Current wall-clock time in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Normalize a numeric epoch to milliseconds
pub fn to_millis(ts: f64) -> i64 {
    if ts < MILLIS_THRESHOLD {
        (ts * 1000.0) as i64
    } else {
        ts as i64
    }
}

/// Normalize an opaque JSON timestamp (number or RFC 3339 string) to milliseconds.
/// Unrecognized shapes map to 0.
pub fn value_to_millis(value: &Value) -> i64 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                to_millis(i as f64)
            } else {
                n.as_f64().map(to_millis).unwrap_or(0)
            }
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.timestamp_millis())
            .unwrap_or(0),
        _ => 0,
    }
}

/// serde helper: accept any timestamp shape and store it as milliseconds.
pub fn deserialize_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_millis(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seconds_are_rescaled() {
        assert_eq!(to_millis(1_700_000_000.0), 1_700_000_000_000);
    }

    #[test]
    fn test_millis_are_untouched() {
        assert_eq!(to_millis(1_700_000_000_000.0), 1_700_000_000_000);
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(to_millis(1_700_000_000.5), 1_700_000_000_500);
    }

    #[test]
    fn test_value_shapes() {
        assert_eq!(value_to_millis(&json!(1_700_000_000)), 1_700_000_000_000);
        assert_eq!(value_to_millis(&json!(1_700_000_000_000i64)), 1_700_000_000_000);
        assert_eq!(
            value_to_millis(&json!("2023-11-14T22:13:20Z")),
            1_700_000_000_000
        );
        assert_eq!(value_to_millis(&json!("yesterday")), 0);
        assert_eq!(value_to_millis(&Value::Null), 0);
    }

    #[test]
    fn test_now_is_millis_scale() {
        assert!(now_millis() as f64 >= MILLIS_THRESHOLD);
    }
}
