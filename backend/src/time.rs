//! Timestamp parsing and formatting.
//!
//! Review timestamps are stored as RFC 3339 UTC text with seconds precision
//! (`2023-04-05T06:07:08Z`), so lexicographic comparison in SQL matches
//! chronological order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Accepts a full RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC) or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_accepted_shapes() {
        let full = parse_timestamp("2023-04-05T06:07:08Z").unwrap();
        assert_eq!(format_timestamp(&full), "2023-04-05T06:07:08Z");

        let offset = parse_timestamp("2023-04-05T08:07:08+02:00").unwrap();
        assert_eq!(format_timestamp(&offset), "2023-04-05T06:07:08Z");

        let naive = parse_timestamp("2023-04-05T06:07:08").unwrap();
        assert_eq!(format_timestamp(&naive), "2023-04-05T06:07:08Z");

        let bare = parse_timestamp("2023-04-05").unwrap();
        assert_eq!(format_timestamp(&bare), "2023-04-05T00:00:00Z");

        assert!(parse_timestamp("not-a-date").is_none());
    }
}
