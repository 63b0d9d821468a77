//! Time windows and the per-source timestamp formats.
//!
//! Each API wants its range in a different shape:
//!
//! | Source | Format | Example |
//! |--------|--------|---------|
//! | NewsAPI | [`TimeFormat::Iso8601`] | `2025-05-06T14:30:00` |
//! | Guardian | [`TimeFormat::DateOnly`] | `2025-05-06` |
//! | GDELT | [`TimeFormat::Compact`] | `20250506143000` |
//! | X | [`TimeFormat::Iso8601Utc`] | `2025-05-06T14:30:00Z` |
//!
//! Everything is held as UTC internally and only rendered at request time.

use crate::error::CollectorError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Timestamp rendering accepted by one of the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Iso8601,
    Iso8601Utc,
    DateOnly,
    Compact,
}

impl TimeFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S",
            TimeFormat::Iso8601Utc => "%Y-%m-%dT%H:%M:%SZ",
            TimeFormat::DateOnly => "%Y-%m-%d",
            TimeFormat::Compact => "%Y%m%d%H%M%S",
        }
    }

    pub fn render(self, ts: DateTime<Utc>) -> String {
        ts.format(self.pattern()).to_string()
    }
}

/// Closed `[start, end]` window, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CollectorError> {
        if start > end {
            return Err(CollectorError::Config(format!(
                "time range start {} is after its end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to `end`.
    pub fn last_days(end: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// January 1st 00:00:00 through December 31st 23:59:59 of `year`.
    pub fn calendar_year(year: i32) -> Result<Self, CollectorError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        let end = NaiveDate::from_ymd_opt(year, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59));
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start.and_utc(), end.and_utc()),
            _ => Err(CollectorError::Config(format!("year {year} is out of range"))),
        }
    }

    /// Render both ends in the given format.
    pub fn render(&self, format: TimeFormat) -> (String, String) {
        (format.render(self.start), format.render(self.end))
    }
}

/// Parse the start of a window. A bare date means midnight.
pub fn parse_start(input: &str) -> Result<DateTime<Utc>, CollectorError> {
    parse_timestamp(input, false)
}

/// Parse the end of a window. A bare date means the last second of that day.
pub fn parse_end(input: &str) -> Result<DateTime<Utc>, CollectorError> {
    parse_timestamp(input, true)
}

const NAIVE_PATTERNS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y%m%d%H%M%S"];

fn parse_timestamp(input: &str, end_of_day: bool) -> Result<DateTime<Utc>, CollectorError> {
    let input = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    for pattern in NAIVE_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let naive = if end_of_day {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(naive) = naive {
            return Ok(naive.and_utc());
        }
    }

    Err(CollectorError::Config(format!(
        "unrecognised timestamp {input:?}; expected RFC 3339, YYYY-MM-DDTHH:MM:SS, YYYYMMDDHHMMSS or YYYY-MM-DD"
    )))
}
