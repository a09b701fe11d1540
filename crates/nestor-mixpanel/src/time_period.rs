//! Free-text time period parsing
//!
//! Turns phrases such as `"3 weeks"` or `"day"` into the `(interval, unit)`
//! pair the segmentation endpoints expect.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PERIOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)?\s*(minute|hour|day|week|month)s?").expect("valid period regex")
});

/// Granularity of a segmentation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl TimeUnit {
    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_end_matches('s') {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("unknown time unit: {other}")),
        }
    }
}

/// A normalized query window: the last `interval` units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimePeriod {
    pub interval: u32,
    pub unit: TimeUnit,
}

impl TimePeriod {
    /// Parse a time period phrase. Never fails.
    ///
    /// Without a unit the period is one day; without a count it is one unit.
    /// A resulting interval of 1 is widened to 2. This has always been the
    /// behaviour of the plugin and looks accidental, but reports depend on it.
    ///
    /// Counts are normalized before they reach the API: a count of zero is
    /// treated as missing and leading zeros are dropped, so `"0 weeks"` and
    /// `"01 day"` both become an interval of 2 rather than being sent as
    /// written.
    pub fn parse(text: &str) -> Self {
        let (interval, unit) = match PERIOD_PATTERN.captures(text) {
            Some(caps) => {
                let unit = caps
                    .get(2)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or_default();
                let interval = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(1);
                (interval, unit)
            }
            None => (1, TimeUnit::Day),
        };

        let interval = if interval == 1 { 2 } else { interval };

        Self { interval, unit }
    }

    /// Interval as the decimal string sent to the API
    pub fn interval_param(&self) -> String {
        self.interval.to_string()
    }
}

impl Default for TimePeriod {
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.interval, self.unit)
    }
}
