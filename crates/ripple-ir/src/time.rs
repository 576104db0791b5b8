//! Date helpers for [`Value::Date`](crate::Value::Date).
//!
//! Dates are epoch milliseconds, like the host language's `Date`. All
//! rendering is done in UTC so server and client output agree regardless
//! of where the evaluator runs.

use chrono::{DateTime, NaiveDate, Utc};

/// Convert epoch milliseconds into a UTC timestamp, `None` for invalid dates.
pub fn to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

/// `Date.prototype.toISOString`, e.g. `2024-03-05T14:07:09.000Z`.
pub fn to_iso_string(ms: f64) -> Option<String> {
    to_datetime(ms).map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// `Date.prototype.toString` rendered in UTC.
pub fn to_display_string(ms: f64) -> String {
    match to_datetime(ms) {
        Some(dt) => dt
            .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
            .to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// `Date.parse`: RFC 3339 date-times and bare `YYYY-MM-DD` dates (UTC).
pub fn parse_date(s: &str) -> f64 {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis() as f64;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp_millis() as f64;
        }
    }
    f64::NAN
}
