//! Engine configuration.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::resolver::AmbiguityPolicy;

/// Civil timezone the timetable is written in.
pub const DEFAULT_TIMEZONE: &str = "Africa/Tunis";

/// Room values that mean "no physical room".
pub const DEFAULT_ONLINE_MARKERS: &[&str] = &["online", "en ligne", "distanciel"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA timezone used to read the clock and to build absolute instants.
    pub timezone: String,
    /// Room values decoded as the online sentinel (case and accent insensitive).
    pub online_markers: Vec<String>,
    /// How the class-code resolver breaks ties between partial matches.
    pub ambiguity: AmbiguityPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            online_markers: DEFAULT_ONLINE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            ambiguity: AmbiguityPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| TimetableError::InvalidTimezone(self.timezone.clone()))
    }
}
