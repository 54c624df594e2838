//! Time-of-day and time-range parsing.
//!
//! Timetable exports write times as `"09:00"`, `"09H:00"`, `"09H00"` or `"9h30"`,
//! and ranges as `"09H:00-12H:15"` or `"09:00 12:15"`. Everything is converted
//! to minutes since midnight. Parsing never defaults: a string that does not
//! match yields `None` and the caller excludes the session.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minutes since midnight.
pub type Minutes = u32;

static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("static time-of-day pattern"));

/// A half-open interval `[start, end)` within one day, in minutes since midnight.
///
/// Constructed only through [`TimeInterval::new`] or [`parse_range`], which
/// guarantee `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    start: Minutes,
    end: Minutes,
}

impl TimeInterval {
    /// Returns `None` unless `start < end`.
    pub fn new(start: Minutes, end: Minutes) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> Minutes {
        self.start
    }

    pub fn end(&self) -> Minutes {
        self.end
    }

    /// Half-open containment: the end instant is not inside the interval.
    pub fn contains(&self, instant: Minutes) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration_minutes(&self) -> Minutes {
        self.end - self.start
    }
}

/// Parse a single time of day into minutes since midnight.
///
/// Accepts `HH:MM` with a 1–2 digit hour, and the hour-marker variants where
/// `H`/`h` replaces or precedes the colon (`09H:00`, `09H00`, `9h30`).
/// Hours above 23 and minutes above 59 are rejected.
pub fn parse_time_of_day(raw: &str) -> Option<Minutes> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed
        .replace("H:", ":")
        .replace("h:", ":")
        .replace(['H', 'h'], ":");

    let caps = TIME_OF_DAY.captures(&normalized)?;
    let hours: Minutes = caps[1].parse().ok()?;
    let minutes: Minutes = caps[2].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parse a time range into a half-open interval.
///
/// The range is first split on `-`; when that does not give exactly two
/// parts, the first two whitespace-separated tokens that look like a time
/// (contain `:` or the hour marker) are used instead. A range whose end is
/// not after its start does not parse.
pub fn parse_range(raw: &str) -> Option<TimeInterval> {
    let (start, end) = split_on_dash(raw).or_else(|| split_on_whitespace(raw))?;
    TimeInterval::new(start, end)
}

fn split_on_dash(raw: &str) -> Option<(Minutes, Minutes)> {
    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parse_time_of_day(parts[0])?, parse_time_of_day(parts[1])?))
}

fn split_on_whitespace(raw: &str) -> Option<(Minutes, Minutes)> {
    let mut candidates = raw.split_whitespace().filter(|token| looks_like_time(token));
    let start = parse_time_of_day(candidates.next()?)?;
    let end = parse_time_of_day(candidates.next()?)?;
    Some((start, end))
}

fn looks_like_time(token: &str) -> bool {
    token.contains([':', 'H', 'h'])
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: Minutes) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
