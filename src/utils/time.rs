//! Time utilities

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse an ISO-8601 date-time.
///
/// Accepts RFC 3339 with an offset, or a local date-time without one
/// (`2026-04-12T07:30:00`, optional fractional seconds) which is read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a race time in milliseconds as `HH:MM:SS`
///
/// Hours are not wrapped at 24. Negative times carry a leading `-`.
pub fn format_race_time(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let total_seconds = ms.unsigned_abs() / 1000;

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
}
