//! Day keys and day-name matching.
//!
//! A schedule's per-day entry is keyed by a day name that may carry a literal
//! date suffix (`"Lundi 10/02/2025"`, `"Mardi, 11-02"`). Queries name a day in
//! English or French. Both sides are reduced to a [`Weekday`] when possible.

use chrono::Weekday;

use crate::text::fold_upper;

/// The bare day name of a day key, with any date suffix stripped.
pub fn bare_day(day_key: &str) -> &str {
    day_key
        .trim()
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or("")
}

/// Recognise an English or French day name, ignoring case and accents.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let weekday = match fold_upper(bare_day(name)).as_str() {
        "MONDAY" | "MON" | "LUNDI" | "LUN" => Weekday::Mon,
        "TUESDAY" | "TUE" | "MARDI" | "MAR" => Weekday::Tue,
        "WEDNESDAY" | "WED" | "MERCREDI" | "MER" => Weekday::Wed,
        "THURSDAY" | "THU" | "JEUDI" | "JEU" => Weekday::Thu,
        "FRIDAY" | "FRI" | "VENDREDI" | "VEN" => Weekday::Fri,
        "SATURDAY" | "SAT" | "SAMEDI" | "SAM" => Weekday::Sat,
        "SUNDAY" | "SUN" | "DIMANCHE" | "DIM" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// A day named by a query, kept with its recognised weekday if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDay {
    label: String,
    weekday: Option<Weekday>,
}

impl QueryDay {
    /// Returns `None` for a blank name: the day cannot be determined.
    pub fn parse(name: &str) -> Option<Self> {
        let label = bare_day(name).to_string();
        if label.is_empty() {
            return None;
        }
        let weekday = parse_weekday(&label);
        Some(Self { label, weekday })
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        Self {
            label: english_name(weekday).to_string(),
            weekday: Some(weekday),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    /// Whether a schedule day key refers to this day.
    ///
    /// Recognised names compare by weekday, so `"Monday"` matches
    /// `"Lundi 10/02/2025"`. Unrecognised names compare by folded bare name.
    pub fn matches(&self, day_key: &str) -> bool {
        match (self.weekday, parse_weekday(day_key)) {
            (Some(a), Some(b)) => a == b,
            _ => fold_upper(&self.label) == fold_upper(bare_day(day_key)),
        }
    }
}

fn english_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
