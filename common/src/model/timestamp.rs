//! Normalization of the timestamp shapes that reach the application.
//!
//! The document store and older clients have written due dates in three
//! different shapes over time:
//!
//! - a number of milliseconds since the Unix epoch,
//! - an object carrying `seconds` (and optionally `nanoseconds`), also spelled
//!   `_seconds` / `_nanoseconds` by some exporters,
//! - an ISO-8601 string, either a full RFC 3339 datetime or a bare `YYYY-MM-DD`.
//!
//! All of them are folded into a single `DateTime<Utc>` at the serde boundary so
//! that nothing past deserialization ever sees the union. A value that cannot be
//! understood becomes "no date" instead of a decoding error. Outbound values are
//! always RFC 3339 strings with millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Message surfaced when a form-provided date cannot be parsed.
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Please use YYYY-MM-DD format.";

/// Converts any supported wire shape into a UTC instant.
///
/// Returns `None` for `null`, for unsupported JSON types and for values that are
/// out of range or malformed.
pub fn from_wire(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(millis) => DateTime::from_timestamp_millis(millis),
            None => number
                .as_f64()
                .filter(|millis| millis.is_finite())
                .and_then(|millis| DateTime::from_timestamp_millis(millis as i64)),
        },
        Value::Object(map) => {
            let seconds = map.get("seconds").or_else(|| map.get("_seconds"))?;
            let seconds = match seconds.as_i64() {
                Some(seconds) => seconds,
                None => seconds.as_f64().filter(|s| s.is_finite())?.floor() as i64,
            };
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        Value::String(text) => parse_text(text),
        _ => None,
    }
}

/// Parses the textual representations accepted from the wire and from forms.
pub fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parses a due date typed by a user.
///
/// Unlike [`from_wire`], a value that cannot be understood is an error, because
/// it has to be reported before anything is sent to the server.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, String> {
    parse_text(input).ok_or_else(|| INVALID_DATE_MESSAGE.to_string())
}

/// Renders an instant in the single outbound representation.
pub fn to_wire(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `#[serde(with = "timestamp::optional")]` for `Option<DateTime<Utc>>` fields.
pub mod optional {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => serializer.serialize_str(&to_wire(instant)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(from_wire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn noon_march_3() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap()
    }

    #[test]
    fn accepts_epoch_millis() {
        let millis = noon_march_3().timestamp_millis();
        assert_eq!(from_wire(&json!(millis)), Some(noon_march_3()));
    }

    #[test]
    fn accepts_seconds_objects_in_both_spellings() {
        let seconds = noon_march_3().timestamp();
        assert_eq!(
            from_wire(&json!({ "seconds": seconds, "nanoseconds": 0 })),
            Some(noon_march_3())
        );
        assert_eq!(
            from_wire(&json!({ "_seconds": seconds, "_nanoseconds": 0 })),
            Some(noon_march_3())
        );
    }

    #[test]
    fn accepts_iso_strings_and_bare_dates() {
        assert_eq!(
            from_wire(&json!("2025-03-03T12:00:00.000Z")),
            Some(noon_march_3())
        );
        assert_eq!(
            from_wire(&json!("2025-03-03T14:00:00+02:00")),
            Some(noon_march_3())
        );
        assert_eq!(
            from_wire(&json!("2025-03-03")),
            Some(Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage_becomes_no_date() {
        assert_eq!(from_wire(&json!("next tuesday")), None);
        assert_eq!(from_wire(&json!({ "seconds": "soon" })), None);
        assert_eq!(from_wire(&json!(true)), None);
        assert_eq!(from_wire(&Value::Null), None);
    }

    #[test]
    fn outbound_format_is_rfc3339_millis() {
        assert_eq!(to_wire(&noon_march_3()), "2025-03-03T12:00:00.000Z");
    }

    #[test]
    fn form_parser_reports_bad_input() {
        assert_eq!(parse_due_date("31/12/2025"), Err(INVALID_DATE_MESSAGE.to_string()));
        assert!(parse_due_date(" 2025-12-31 ").is_ok());
    }
}
