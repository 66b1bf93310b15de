//! Parsing of cluster time-field values and human-readable formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt::Display;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

/// Parses a time-field value as returned in a search hit's `_source`.
///
/// Accepts RFC 3339 strings, naive date-times (taken as UTC), bare dates and
/// epoch milliseconds. Returns `None` for anything else.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|millis| millis as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::Array(values) => values.first().and_then(parse_timestamp),
        _ => None,
    }
}

pub fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    text.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Relative age such as `5 minutes ago`. Future instants count as zero.
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);

    if seconds < MINUTE {
        format!("{seconds} seconds ago")
    } else if seconds < HOUR {
        format!("{} minutes ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{} hours ago", seconds / HOUR)
    } else if seconds < MONTH {
        format!("{} days ago", seconds / DAY)
    } else {
        format!("{} months ago", seconds / MONTH)
    }
}

/// `YYYY-MM-DD HH:MM:SS (<age>)` rendered in `tz`.
pub fn format_last_time<Tz>(timestamp: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} ({})",
        timestamp.with_timezone(tz).format("%Y-%m-%d %H:%M:%S"),
        format_time_ago(timestamp, now)
    )
}

/// Formats a count with `,` thousands separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        match Utc
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
        {
            Some(value) => value,
            None => panic!("invalid test timestamp"),
        }
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_timestamp(&json!("2024-05-01T14:30:00+02:00"));
        assert_eq!(parsed, Some(at(2024, 5, 1, 12, 30, 0)));
    }

    #[test]
    fn parses_naive_and_date_only_values_as_utc() {
        assert_eq!(
            parse_timestamp(&json!("2024-05-01T12:30:00.123")),
            Some(at(2024, 5, 1, 12, 30, 0) + Duration::milliseconds(123))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-05-01")),
            Some(at(2024, 5, 1, 0, 0, 0))
        );
    }

    #[test]
    fn parses_epoch_millis() {
        assert_eq!(
            parse_timestamp(&json!(1_714_566_600_000_i64)),
            Some(at(2024, 5, 1, 12, 30, 0))
        );
        assert_eq!(
            parse_timestamp(&json!("1714566600000")),
            Some(at(2024, 5, 1, 12, 30, 0))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
        assert_eq!(parse_timestamp(&json!({"a": 1})), None);
        assert_eq!(parse_timestamp(&json!("")), None);
    }

    #[test]
    fn time_ago_buckets() {
        let now = at(2024, 5, 1, 12, 0, 0);
        assert_eq!(format_time_ago(now - Duration::seconds(5), now), "5 seconds ago");
        assert_eq!(format_time_ago(now - Duration::minutes(3), now), "3 minutes ago");
        assert_eq!(format_time_ago(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(4), now), "4 days ago");
        assert_eq!(format_time_ago(now - Duration::days(65), now), "2 months ago");
        assert_eq!(format_time_ago(now + Duration::seconds(30), now), "0 seconds ago");
    }

    #[test]
    fn last_time_includes_absolute_and_relative_parts() {
        let now = at(2024, 5, 1, 12, 0, 0);
        let rendered = format_last_time(now - Duration::seconds(42), now, &Utc);
        assert_eq!(rendered, "2024-05-01 11:59:18 (42 seconds ago)");
    }

    #[test]
    fn count_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
