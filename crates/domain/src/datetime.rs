//! Tolerant datetime normalization.
//!
//! The upstream configuration source stores start times in whatever shape
//! the row happened to be written with: `"YYYY-MM-DD HH:mm"`,
//! `"YYYY-MM-DD HH:mm:ss"`, ISO-8601 with a `T` separator, a serialized
//! date object, epoch milliseconds, or nothing at all. [`normalize`] resolves
//! any of these to one canonical UTC instant, or `None` when there is no
//! usable schedule. It never panics and never errors: a malformed start time
//! means "no automatic trigger", not a fault.
//!
//! Naive strings (no offset) are interpreted as UTC so the result depends
//! only on the input, not on the host timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::time::Timestamp;

/// All-zero dates are how the upstream marks "unset".
const UNSET_PREFIX: &str = "0000-00-00";

/// Resolve an arbitrary JSON value to a canonical instant.
///
/// Accepts strings in any supported encoding, serialized date objects
/// carrying a `_d` field, and integer epoch milliseconds. Anything else,
/// including `null`, yields `None`.
#[must_use]
pub fn normalize(raw: &Value) -> Option<Timestamp> {
    match raw {
        Value::String(s) => normalize_str(s),
        // Serialized date wrapper ({"_d": "..."}) from the legacy settings UI.
        Value::Object(map) => map.get("_d").and_then(Value::as_str).and_then(normalize_str),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Resolve a string to a canonical instant.
///
/// Rules are ordered and first-match wins; a rule whose parse fails falls
/// through to the next one, and `None` is returned only when every rule
/// fails.
#[must_use]
pub fn normalize_str(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if s.is_empty() || s.starts_with(UNSET_PREFIX) {
        return None;
    }

    // "YYYY-MM-DD HH:mm" — seconds default to :00.
    if s.contains(' ') && s.len() == 16 {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
            return Some(dt.and_utc());
        }
    }

    // "YYYY-MM-DD HH:mm:ss"
    if s.contains(' ') && s.len() == 19 {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.and_utc());
        }
    }

    // ISO-8601 with a T separator, with or without an explicit offset.
    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(dt.and_utc());
            }
        }
    }

    generic_parse(s)
}

/// Last-resort parse attempts for encodings the fast paths missed.
fn generic_parse(s: &str) -> Option<Timestamp> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format an instant for the automation backend: `YYYY-MM-DDTHH:mm:ss`.
#[must_use]
pub fn format_wire(ts: Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Format an instant the way the upstream database stores it.
#[must_use]
pub fn format_db(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Minute-precision variant of [`format_db`].
#[must_use]
pub fn format_db_minutes(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_minute_precision_db_format() {
        let ts = normalize_str("2025-05-31 14:37").unwrap();
        assert_eq!(format_db(ts), "2025-05-31 14:37:00");
    }

    #[test]
    fn should_default_seconds_to_zero_for_minute_precision() {
        assert_eq!(
            normalize_str("2025-05-31 14:37"),
            normalize_str("2025-05-31 14:37:00")
        );
    }

    #[test]
    fn should_parse_second_precision_db_format() {
        let ts = normalize_str("2025-05-31 14:37:09").unwrap();
        assert_eq!(format_db(ts), "2025-05-31 14:37:09");
    }

    #[test]
    fn should_parse_iso_with_t_separator() {
        let ts = normalize_str("2025-05-31T14:37:00").unwrap();
        assert_eq!(format_wire(ts), "2025-05-31T14:37:00");
    }

    #[test]
    fn should_parse_iso_with_utc_offset() {
        let ts = normalize_str("2025-05-31T14:37:00Z").unwrap();
        assert_eq!(format_wire(ts), "2025-05-31T14:37:00");
    }

    #[test]
    fn should_parse_iso_with_explicit_offset() {
        let ts = normalize_str("2025-05-31T14:37:00+09:00").unwrap();
        assert_eq!(format_wire(ts), "2025-05-31T05:37:00");
    }

    #[test]
    fn should_roundtrip_all_supported_string_formats() {
        for raw in [
            "2025-05-31 14:37:00",
            "2025-05-31T14:37:00",
        ] {
            let ts = normalize_str(raw).unwrap();
            let rendered = if raw.contains('T') {
                format_wire(ts)
            } else {
                format_db(ts)
            };
            assert_eq!(rendered, raw);
        }
        let ts = normalize_str("2025-05-31 14:37").unwrap();
        assert_eq!(format_db_minutes(ts), "2025-05-31 14:37");
    }

    #[test]
    fn should_return_none_for_empty_and_whitespace() {
        assert_eq!(normalize_str(""), None);
        assert_eq!(normalize_str("   "), None);
    }

    #[test]
    fn should_return_none_for_all_zero_sentinel() {
        assert_eq!(normalize_str("0000-00-00"), None);
        assert_eq!(normalize_str("0000-00-00 00:00:00"), None);
    }

    #[test]
    fn should_return_none_for_garbage_without_panicking() {
        for raw in [
            "not a date",
            "2025-13-45 99:99",
            "2025-05-31 14:3",
            "14:37",
            "💥",
            "2025-05-31X14:37:00",
        ] {
            assert_eq!(normalize_str(raw), None, "input: {raw}");
        }
    }

    #[test]
    fn should_fall_through_when_sixteen_char_rule_fails() {
        // 16 chars with a space but not the db layout — lands in the
        // generic ladder, which also rejects it.
        assert_eq!(normalize_str("31/05/2025 14:37"), None);
    }

    #[test]
    fn should_parse_bare_date_as_midnight() {
        let ts = normalize_str("2025-05-31").unwrap();
        assert_eq!(format_db(ts), "2025-05-31 00:00:00");
    }

    #[test]
    fn should_normalize_json_string_value() {
        let raw = serde_json::json!("2025-05-31 14:37");
        assert_eq!(normalize(&raw), normalize_str("2025-05-31 14:37"));
    }

    #[test]
    fn should_normalize_serialized_date_object() {
        let raw = serde_json::json!({ "_d": "2025-05-31T14:37:00Z" });
        assert_eq!(normalize(&raw), normalize_str("2025-05-31T14:37:00Z"));
    }

    #[test]
    fn should_normalize_epoch_milliseconds() {
        let raw = serde_json::json!(1_748_702_220_000_i64);
        let ts = normalize(&raw).unwrap();
        assert_eq!(format_wire(ts), "2025-05-31T14:37:00");
    }

    #[test]
    fn should_return_none_for_null_and_other_json_shapes() {
        assert_eq!(normalize(&serde_json::Value::Null), None);
        assert_eq!(normalize(&serde_json::json!(true)), None);
        assert_eq!(normalize(&serde_json::json!(["2025-05-31"])), None);
        assert_eq!(normalize(&serde_json::json!({ "other": 1 })), None);
    }

    #[test]
    fn should_be_referentially_transparent() {
        let a = normalize_str("2025-05-31 14:37");
        let b = normalize_str("2025-05-31 14:37");
        assert_eq!(a, b);
    }
}
