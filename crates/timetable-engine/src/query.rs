//! The two read-only queries exposed to transports, and the [`Engine`] that
//! answers them from the current snapshot.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::building::BuildingFilter;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::dataset::ScheduleDataset;
use crate::days::QueryDay;
use crate::error::Result;
use crate::locator::{locate, LocateTarget, LocationReport};
use crate::occupancy::{resolve_occupancy, OccupancyReport};
use crate::resolver::{resolve_class_code, MatchKind, Unresolved};
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::timeparse::{parse_range, parse_time_of_day, Minutes};

/// Which rooms are free at `day` / `time`, optionally in one building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyRequest {
    pub day: Option<String>,
    /// `HH:MM`, or the hour-marker variants.
    pub time: Option<String>,
    /// A building letter or `"all"`.
    #[serde(default, alias = "buildingFilter")]
    pub building: Option<String>,
}

/// Where is `class_code` at `day` / `time` (both default to now).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub class_code: String,
    pub day: Option<String>,
    /// `HH:MM` or `HH:MM-HH:MM`; a range targets its start.
    pub time: Option<String>,
}

/// Outcome of resolving a class code on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionReport {
    #[serde(rename_all = "camelCase")]
    Resolved { key: String, match_kind: MatchKind },
    NoDigit,
    NotFound,
    Ambiguous { candidates: Vec<String> },
}

pub struct Engine {
    store: SnapshotStore,
    config: EngineConfig,
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("version", &self.store.current().version)
            .finish()
    }
}

impl Engine {
    /// Build an engine over an already-loaded dataset.
    ///
    /// # Errors
    /// Returns `TimetableError::InvalidTimezone` if the configured timezone is
    /// not a valid IANA identifier.
    pub fn new(
        dataset: ScheduleDataset,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let tz = config.tz()?;
        let store = SnapshotStore::new(dataset, clock.now_utc());
        Ok(Self {
            store,
            config,
            tz,
            clock,
        })
    }

    /// Load the dataset at `path` and build an engine over it.
    pub fn from_path(
        path: impl AsRef<Path>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let dataset = ScheduleDataset::load(path, &config)?;
        Self::new(dataset, config, clock)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Swap in a freshly decoded dataset.
    pub fn publish(&self, dataset: ScheduleDataset) -> u64 {
        self.store.publish(dataset, self.clock.now_utc())
    }

    /// Re-read the dataset file; the current snapshot survives a failure.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<u64> {
        self.store.reload(path, &self.config, self.clock.now_utc())
    }

    /// The clock's current reading in the timetable's timezone.
    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now_utc().with_timezone(&self.tz)
    }

    pub fn occupancy(&self, request: &OccupancyRequest) -> OccupancyReport {
        let snapshot = self.store.current();
        let day = request.day.as_deref().and_then(QueryDay::parse);
        let instant = request.time.as_deref().and_then(parse_time_of_day);
        let filter = BuildingFilter::parse(request.building.as_deref());
        resolve_occupancy(&snapshot.dataset, day.as_ref(), instant, &filter)
    }

    pub fn resolve(&self, class_code: &str) -> ResolutionReport {
        let snapshot = self.store.current();
        match resolve_class_code(class_code, snapshot.dataset.keys(), self.config.ambiguity) {
            Ok(resolved) => ResolutionReport::Resolved {
                key: resolved.key.to_string(),
                match_kind: resolved.kind,
            },
            Err(Unresolved::NoDigit) => ResolutionReport::NoDigit,
            Err(Unresolved::NotFound) => ResolutionReport::NotFound,
            Err(Unresolved::Ambiguous(candidates)) => ResolutionReport::Ambiguous { candidates },
        }
    }

    pub fn locate(&self, request: &LocationRequest) -> LocationReport {
        let snapshot = self.store.current();
        let dataset = &snapshot.dataset;

        let class = match resolve_class_code(&request.class_code, dataset.keys(), self.config.ambiguity)
        {
            Ok(resolved) => {
                tracing::debug!(
                    input = %request.class_code,
                    key = resolved.key,
                    kind = ?resolved.kind,
                    "class code resolved"
                );
                dataset.class(resolved.key)
            }
            Err(reason) => {
                tracing::debug!(input = %request.class_code, ?reason, "class code unresolved");
                None
            }
        };

        let target = self.target(request.day.as_deref(), request.time.as_deref());
        locate(class, &target)
    }

    fn target(&self, day: Option<&str>, time: Option<&str>) -> LocateTarget {
        let now = self.now();
        let today = now.date_naive();

        let day = day.and_then(QueryDay::parse);
        let date = match day.as_ref().and_then(QueryDay::weekday) {
            Some(weekday) => next_occurrence(today, weekday),
            None => today,
        };
        let day = day.unwrap_or_else(|| QueryDay::from_weekday(today.weekday()));

        let instant = time.and_then(parse_target_time).unwrap_or_else(|| {
            if let Some(raw) = time {
                tracing::debug!(time = raw, "unparseable query time, using now");
            }
            now.hour() * 60 + now.minute()
        });

        LocateTarget {
            day,
            instant,
            date,
            tz: self.tz,
        }
    }
}

/// A single time, or the start of a range.
fn parse_target_time(raw: &str) -> Option<Minutes> {
    parse_time_of_day(raw).or_else(|| parse_range(raw).map(|interval| interval.start()))
}

/// `weekday` on or after `from`.
fn next_occurrence(from: NaiveDate, weekday: chrono::Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(i64::from(ahead))
}
