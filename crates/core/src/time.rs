//! ISO-8601 timestamp helpers, matching the original implementation's
//! `chrono.go` (`RFC3339NanoUTC` for records, `RFC3339MicroUTC` for log
//! events).

use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC instant, nanosecond precision, formatted as ISO-8601.
///
/// A real clock is used everywhere except tests, which inject timestamps
/// directly rather than mocking `now()` — the store and engine never branch
/// on wall-clock time, only record it.
pub fn now_nanos() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Current UTC instant, microsecond precision (log events).
pub fn now_micros() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an ISO-8601 timestamp produced by [`now_nanos`] or [`now_micros`].
pub fn parse(iso: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(iso).map(|dt| dt.with_timezone(&Utc))
}

/// `a <= b`, treating unparsable timestamps as incomparable (`false`).
pub fn le(a: &str, b: &str) -> bool {
    match (parse(a), parse(b)) {
        (Ok(a), Ok(b)) => a <= b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
