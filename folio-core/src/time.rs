//! Time utilities: calendar dates from host timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::error::NormalizeError;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an IANA zone like "America/Toronto".
pub fn parse_timezone(tz: &str) -> Result<Tz, NormalizeError> {
    tz.parse()
        .map_err(|_| NormalizeError::InvalidTimezone(tz.to_string()))
}

/// Calendar date of a host timestamp as seen from `tz`.
///
/// Accepts RFC 3339 strings, naive date-times (already local to `tz`),
/// bare `YYYY-MM-DD` dates, and numbers as epoch milliseconds.
pub fn calendar_date(value: &Value, tz: Tz) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
            Some(utc.with_timezone(&tz).date_naive())
        }
        Value::String(s) => calendar_date_from_str(s.trim(), tz),
        _ => None,
    }
}

fn calendar_date_from_str(s: &str, tz: Tz) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&tz).date_naive());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Today's date in UTC, the default upper bound of a transaction query.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
