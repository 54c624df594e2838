//! The timetable dataset: class groups, their days and their sessions.
//!
//! The dataset is produced by an external export and read here as JSON:
//!
//! ```json
//! {
//!   "4ERP-BI3": {
//!     "metadata": { "year": "2024-2025", "period": "P2" },
//!     "Lundi 10/02/2025": [
//!       { "time": "09H:00-12H:15", "course": "Big Data\nM. Ben Salah", "room": "I104" }
//!     ]
//!   }
//! }
//! ```
//!
//! Object order is kept: class order is the dataset's iteration order, and day
//! order is the order sessions are scanned in. Sentinel course tokens, online
//! room markers and time ranges are decoded once here, so queries never
//! compare raw strings.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{EngineConfig, DEFAULT_ONLINE_MARKERS};
use crate::error::{Result, TimetableError};
use crate::text::fold_upper;
use crate::timeparse::{parse_range, TimeInterval};

const METADATA_KEYS: &[&str] = &["metadata", "_metadata"];

/// What a session's course field means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseKind {
    /// An ordinary course, optionally followed by its instructor on the next line.
    Scheduled {
        name: String,
        instructor: Option<String>,
    },
    /// `FREE`: the slot is a break (typically lunch); the room is not used.
    Free,
    /// `FREEWARNING`: the room is nominally free but may be taken.
    FreeWarning,
    /// `NOT-FREE`: the room is taken, without a course name.
    NotFree,
}

impl CourseKind {
    pub fn decode(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "FREE" => CourseKind::Free,
            "FREEWARNING" => CourseKind::FreeWarning,
            "NOT-FREE" => CourseKind::NotFree,
            _ => {
                let label = raw.trim();
                match label.split_once('\n') {
                    Some((name, instructor)) if !instructor.trim().is_empty() => {
                        CourseKind::Scheduled {
                            name: name.trim().to_string(),
                            instructor: Some(instructor.trim().to_string()),
                        }
                    }
                    _ => CourseKind::Scheduled {
                        name: label.to_string(),
                        instructor: None,
                    },
                }
            }
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, CourseKind::Free)
    }

    /// Sessions that represent an actual upcoming class for the locator.
    pub fn is_attendable(&self) -> bool {
        !matches!(self, CourseKind::Free | CourseKind::NotFree)
    }
}

/// Case- and accent-insensitive set of room values meaning "online".
#[derive(Debug, Clone)]
pub struct OnlineMarkers(Vec<String>);

impl OnlineMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(markers.into_iter().map(|m| fold_upper(m.as_ref())).collect())
    }

    pub fn is_online(&self, room: &str) -> bool {
        let folded = fold_upper(room);
        self.0.iter().any(|marker| *marker == folded)
    }
}

impl Default for OnlineMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_ONLINE_MARKERS)
    }
}

/// Where a session takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomRef {
    Physical(String),
    Online,
    Unassigned,
}

impl RoomRef {
    pub fn decode(raw: &str, markers: &OnlineMarkers) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            RoomRef::Unassigned
        } else if markers.is_online(trimmed) {
            RoomRef::Online
        } else {
            RoomRef::Physical(trimmed.to_string())
        }
    }

    /// The room code, for physical rooms only.
    pub fn code(&self) -> Option<&str> {
        match self {
            RoomRef::Physical(code) => Some(code),
            _ => None,
        }
    }
}

/// One scheduled time block, with its raw fields and their decoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub raw_time: String,
    pub raw_course: String,
    pub raw_room: String,
    pub course: CourseKind,
    pub room: RoomRef,
    /// `None` when the time range does not parse; such sessions are ignored
    /// by every query.
    pub interval: Option<TimeInterval>,
}

impl Session {
    /// Decode a session with the default online markers.
    pub fn new(time: &str, course: &str, room: &str) -> Self {
        Self::decode(time, course, room, &OnlineMarkers::default())
    }

    pub fn decode(time: &str, course: &str, room: &str, markers: &OnlineMarkers) -> Self {
        Self {
            raw_time: time.to_string(),
            raw_course: course.to_string(),
            raw_room: room.to_string(),
            course: CourseKind::decode(course),
            room: RoomRef::decode(room, markers),
            interval: parse_range(time),
        }
    }
}

/// The sessions of one day key, in stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub key: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

/// One class group's week.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSchedule {
    pub id: String,
    pub days: Vec<DaySchedule>,
    pub metadata: Option<Metadata>,
}

impl ClassSchedule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            days: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_day(mut self, key: impl Into<String>, sessions: Vec<Session>) -> Self {
        self.days.push(DaySchedule {
            key: key.into(),
            sessions,
        });
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn sessions(&self) -> impl Iterator<Item = (&DaySchedule, &Session)> {
        self.days
            .iter()
            .flat_map(|day| day.sessions.iter().map(move |session| (day, session)))
    }
}

/// An immutable timetable snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScheduleDataset {
    classes: Vec<ClassSchedule>,
    index: HashMap<String, usize>,
    rooms: BTreeSet<String>,
}

#[derive(Deserialize)]
struct RawSession {
    #[serde(default, alias = "timeRange", alias = "horaire")]
    time: Option<String>,
    #[serde(default, alias = "matiere")]
    course: Option<String>,
    #[serde(default, alias = "salle")]
    room: Option<String>,
}

impl ScheduleDataset {
    /// Build a dataset from already-decoded schedules. A repeated class id
    /// keeps its first occurrence.
    pub fn new(classes: Vec<ClassSchedule>) -> Self {
        let mut kept = Vec::with_capacity(classes.len());
        let mut index = HashMap::with_capacity(classes.len());
        for class in classes {
            if index.contains_key(&class.id) {
                tracing::debug!(class = %class.id, "duplicate class id ignored");
                continue;
            }
            index.insert(class.id.clone(), kept.len());
            kept.push(class);
        }

        let rooms = kept
            .iter()
            .flat_map(|class| class.sessions())
            .filter_map(|(_, session)| session.room.code())
            .map(str::to_string)
            .collect();

        Self {
            classes: kept,
            index,
            rooms,
        }
    }

    /// Decode a dataset from its JSON text.
    pub fn from_json(json: &str, config: &EngineConfig) -> Result<Self> {
        let markers = OnlineMarkers::new(&config.online_markers);
        let root: Map<String, Value> = serde_json::from_str(json)?;

        let mut classes = Vec::with_capacity(root.len());
        for (id, body) in root {
            classes.push(decode_class(id, body, &markers)?);
        }

        let dataset = Self::new(classes);
        tracing::debug!(
            classes = dataset.len(),
            rooms = dataset.rooms.len(),
            excluded = dataset.excluded_sessions().count(),
            "dataset decoded"
        );
        Ok(dataset)
    }

    /// Read and decode a dataset file.
    pub fn load(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json, config)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class groups in dataset order.
    pub fn classes(&self) -> &[ClassSchedule] {
        &self.classes
    }

    pub fn class(&self, id: &str) -> Option<&ClassSchedule> {
        self.index.get(id).map(|&i| &self.classes[i])
    }

    /// Class ids in dataset order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|class| class.id.as_str())
    }

    /// Every physical room referenced anywhere in the dataset.
    pub fn room_universe(&self) -> &BTreeSet<String> {
        &self.rooms
    }

    pub fn session_count(&self) -> usize {
        self.classes
            .iter()
            .map(|class| class.sessions().count())
            .sum()
    }

    /// Sessions whose time range does not parse, with their class and day.
    pub fn excluded_sessions(
        &self,
    ) -> impl Iterator<Item = (&ClassSchedule, &DaySchedule, &Session)> {
        self.classes.iter().flat_map(|class| {
            class
                .sessions()
                .filter(|(_, session)| session.interval.is_none())
                .map(move |(day, session)| (class, day, session))
        })
    }
}

fn decode_class(id: String, body: Value, markers: &OnlineMarkers) -> Result<ClassSchedule> {
    let Value::Object(entries) = body else {
        return Err(TimetableError::Dataset(format!(
            "class '{}' must be an object of days",
            id
        )));
    };

    let mut class = ClassSchedule::new(id);
    for (key, value) in entries {
        if METADATA_KEYS.contains(&key.as_str()) {
            let metadata: Metadata = serde_json::from_value(value).map_err(|e| {
                TimetableError::Dataset(format!("class '{}' metadata: {}", class.id, e))
            })?;
            class.metadata = Some(metadata);
            continue;
        }

        if !value.is_array() {
            return Err(TimetableError::Dataset(format!(
                "class '{}', day '{}' must be an array of sessions",
                class.id, key
            )));
        }
        let raw: Vec<RawSession> = serde_json::from_value(value).map_err(|e| {
            TimetableError::Dataset(format!("class '{}', day '{}': {}", class.id, key, e))
        })?;

        let sessions = raw
            .into_iter()
            .map(|s| {
                let session = Session::decode(
                    s.time.as_deref().unwrap_or(""),
                    s.course.as_deref().unwrap_or(""),
                    s.room.as_deref().unwrap_or(""),
                    markers,
                );
                if session.interval.is_none() {
                    tracing::debug!(
                        class = %class.id,
                        day = %key,
                        time = %session.raw_time,
                        "session excluded: unparseable time range"
                    );
                }
                session
            })
            .collect();
        class.days.push(DaySchedule { key, sessions });
    }
    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_decode_case_insensitively() {
        assert_eq!(CourseKind::decode("FREE"), CourseKind::Free);
        assert_eq!(CourseKind::decode(" freewarning "), CourseKind::FreeWarning);
        assert_eq!(CourseKind::decode("Not-Free"), CourseKind::NotFree);
    }

    #[test]
    fn course_label_splits_instructor_on_newline() {
        assert_eq!(
            CourseKind::decode("Big Data\nM. Ben Salah"),
            CourseKind::Scheduled {
                name: "Big Data".to_string(),
                instructor: Some("M. Ben Salah".to_string()),
            }
        );
        assert_eq!(
            CourseKind::decode("MATH"),
            CourseKind::Scheduled {
                name: "MATH".to_string(),
                instructor: None,
            }
        );
    }

    #[test]
    fn online_marker_is_not_a_room() {
        let markers = OnlineMarkers::default();
        assert_eq!(RoomRef::decode("En Ligne", &markers), RoomRef::Online);
        assert_eq!(RoomRef::decode("", &markers), RoomRef::Unassigned);
        assert_eq!(
            RoomRef::decode(" A101 ", &markers),
            RoomRef::Physical("A101".to_string())
        );
    }
}
