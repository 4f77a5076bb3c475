//! Backend timestamp handling.
//!
//! The backend emits UTC timestamps, sometimes without a zone suffix
//! (`2024-09-30T14:23:00`), sometimes as plain dates (`2024-10-05`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp, treating zone-less values as UTC.
pub fn parse_backend_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human distance between `then` and `now`, e.g. "5 minutes ago".
pub fn relative_to(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    let (amount, unit, future) = {
        let abs = secs.unsigned_abs();
        let future = secs < 0;
        match abs {
            0..=44 => return "just now".to_string(),
            45..=3_599 => (abs.div_ceil(60).max(1), "minute", future),
            3_600..=86_399 => (abs / 3_600, "hour", future),
            86_400..=2_591_999 => (abs / 86_400, "day", future),
            2_592_000..=31_535_999 => (abs / 2_592_000, "month", future),
            _ => (abs / 31_536_000, "year", future),
        }
    };
    let plural = if amount == 1 { "" } else { "s" };
    if future {
        format!("in {} {}{}", amount, unit, plural)
    } else {
        format!("{} {}{} ago", amount, unit, plural)
    }
}

/// Relative description of a raw backend timestamp, or the raw text when it
/// cannot be parsed.
pub fn humanize(raw: &str, now: DateTime<Utc>) -> String {
    match parse_backend_time(raw) {
        Some(then) => relative_to(then, now),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_zone_less_as_utc() {
        let parsed = parse_backend_time("2024-09-30T14:23:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 9, 30, 14, 23, 0).unwrap());
        let zoned = parse_backend_time("2024-09-30T14:23:00Z").unwrap();
        assert_eq!(parsed, zoned);
    }

    #[test]
    fn test_parse_plain_date() {
        let parsed = parse_backend_time("2024-10-05").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 10, 5, 0, 0, 0).unwrap());
        assert!(parse_backend_time("next tuesday").is_none());
    }

    #[test]
    fn test_relative_to() {
        let now = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_to(now - Duration::seconds(10), now), "just now");
        assert_eq!(relative_to(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_to(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(relative_to(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_to(now + Duration::days(2), now), "in 2 days");
    }

    #[test]
    fn test_humanize_falls_back_to_raw() {
        let now = Utc::now();
        assert_eq!(humanize("garbage", now), "garbage");
    }
}
