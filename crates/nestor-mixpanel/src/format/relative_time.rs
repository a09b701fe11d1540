//! Relative time phrases ("3 days ago")

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse the timestamp shapes Mixpanel stores in profile properties
///
/// Zone-less values are taken as UTC. Bare integers are unix seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Describe `ts` relative to `now`, e.g. "a minute ago" or "in 3 days"
pub fn from_now(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts).num_seconds();
    let phrase = humanize(elapsed.unsigned_abs());

    if elapsed >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

/// Relative phrase for a raw property value; `unknown` when it cannot be read
pub fn describe(value: Option<&str>, now: DateTime<Utc>) -> String {
    value
        .and_then(parse_timestamp)
        .map_or_else(|| "unknown".to_string(), |ts| from_now(ts, now))
}

fn humanize(secs: u64) -> String {
    let secs = secs as f64;
    let days_exact = secs / 86_400.0;
    let months_exact = days_exact * 4800.0 / 146_097.0;

    let seconds = secs.round();
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3600.0).round();
    let days = days_exact.round();
    let months = months_exact.round();
    let years = (months_exact / 12.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_thresholds() {
        let cases = [
            (Duration::seconds(10), "a few seconds ago"),
            (Duration::seconds(60), "a minute ago"),
            (Duration::minutes(30), "30 minutes ago"),
            (Duration::minutes(50), "an hour ago"),
            (Duration::hours(5), "5 hours ago"),
            (Duration::hours(30), "a day ago"),
            (Duration::days(3), "3 days ago"),
            (Duration::days(30), "a month ago"),
            (Duration::days(90), "3 months ago"),
            (Duration::days(400), "a year ago"),
            (Duration::days(365 * 3), "3 years ago"),
        ];

        for (ago, expected) in cases {
            assert_eq!(from_now(now() - ago, now()), expected, "for {ago:?}");
        }
    }

    #[test]
    fn test_future() {
        assert_eq!(from_now(now() + Duration::days(2), now()), "in 2 days");
    }

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2016, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2016-03-07T12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2016-03-07 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2016-03-07T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("1457352000"), Some(expected));
        assert_eq!(
            parse_timestamp("2016-03-07"),
            Utc.with_ymd_and_hms(2016, 3, 7, 0, 0, 0).single()
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(Some("2016-03-07T12:00:00"), now()), "3 days ago");
        assert_eq!(describe(None, now()), "unknown");
        assert_eq!(describe(Some("garbage"), now()), "unknown");
    }
}
