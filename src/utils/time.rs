//! Time and timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as ISO 8601 with millisecond precision
pub fn iso8601_now() -> String {
    format_iso8601(Utc::now())
}

/// Format a UTC time as ISO 8601 (`2024-01-01T00:00:00.000Z`)
pub fn format_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_iso8601() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_iso8601(at), "2024-03-05T07:08:09.000Z");
    }

    #[test]
    fn test_now_parses_back() {
        let now = iso8601_now();
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
