//! Rendering of backend timestamps in the viewer's time zone.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// Placeholder for a missing timestamp.
pub const MISSING_DATE: &str = "N/A";

/// Placeholder for a timestamp that does not parse.
pub const INVALID_DATE: &str = "Invalid Date";

const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p %Z";

/// Parse a backend timestamp. Values without an offset are taken as UTC.
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a UTC timestamp string in the given time zone, e.g.
/// `"Dec 1, 2023, 09:30 AM UTC"`.
///
/// The trailing zone is whatever the offset type displays: `UTC` for
/// [`Utc`], a numeric offset such as `+05:30` for [`Local`] and
/// `FixedOffset`, which carry no zone name.
pub fn format_datetime_in<Tz>(value: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if value.trim().is_empty() {
        return MISSING_DATE.to_string();
    }
    match parse_utc(value) {
        Some(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Format a UTC timestamp string in the local time zone. The zone is shown
/// as a numeric offset.
pub fn format_local_datetime(value: &str) -> String {
    format_datetime_in(value, &Local)
}
