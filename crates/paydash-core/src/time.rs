//! Timestamp parsing and date-bound helpers for the table filters
//!
//! Upstream timestamps arrive in a handful of shapes (RFC 3339, naive
//! date-time, bare date). Everything is normalised to UTC; anything that
//! does not parse becomes `None` and is treated as a missing timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an upstream payment timestamp
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    parse_date(s).map(day_start)
}

/// Parse a `YYYY-MM-DD` date as typed into a date picker
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// First instant of the day (00:00:00.000 UTC)
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond of the day (23:59:59.999 UTC)
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|| day_start(date))
}

/// Sort key for timestamps; missing sorts as the epoch
pub fn epoch_millis(ts: Option<&DateTime<Utc>>) -> i64 {
    ts.map(|t| t.timestamp_millis()).unwrap_or(0)
}

/// Canonical string form used for display and free-text search
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-03-10T10:30:00+05:30").unwrap();
        assert_eq!(ts.hour(), 5);
        assert_eq!(ts.minute(), 0);
    }

    #[test]
    fn test_parse_naive_and_bare_date() {
        let ts = parse_timestamp("2024-03-10T10:30:15.250").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);

        let ts = parse_timestamp("2024-03-10 08:00:00").unwrap();
        assert_eq!(ts.hour(), 8);

        let ts = parse_timestamp("2024-01-01").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2024, 1, 1, 0));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format_timestamp(&day_start(date)), "2024-02-29T00:00:00.000Z");
        assert_eq!(format_timestamp(&day_end(date)), "2024-02-29T23:59:59.999Z");
    }

    #[test]
    fn test_epoch_millis_missing_is_zero() {
        assert_eq!(epoch_millis(None), 0);
        let ts = parse_timestamp("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(epoch_millis(Some(&ts)), 1000);
    }
}
