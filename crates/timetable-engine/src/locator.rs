//! Where is a class group now, or where will it be next?
//!
//! The locator scans one resolved class group's sessions for the target day:
//!
//! 1. the first non-`FREE` session containing the target minute is the
//!    current session;
//! 2. otherwise, if the minute falls inside a `FREE` block (lunch break), the
//!    search for the next session resumes at the end of that block;
//! 3. the first attendable session of the day starting at or after the resume
//!    point is the next session;
//! 4. failing that, the first attendable session of the whole week is.
//!
//! `FREE` and `NOT-FREE` sessions are never reported as "next". Sessions whose
//! time range does not parse are skipped everywhere.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::building::building_of;
use crate::dataset::{ClassSchedule, DaySchedule, RoomRef, Session};
use crate::days::{bare_day, QueryDay};
use crate::timeparse::{format_minutes, Minutes, TimeInterval};

/// The moment a location query is about.
#[derive(Debug, Clone)]
pub struct LocateTarget {
    pub day: QueryDay,
    pub instant: Minutes,
    /// Calendar date used to turn the current session into absolute instants.
    pub date: NaiveDate,
    pub tz: Tz,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    pub id: String,
    /// Building letter; `None` for online or unassigned rooms.
    pub building: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSpan {
    pub start_instant: DateTime<FixedOffset>,
    pub end_instant: DateTime<FixedOffset>,
    pub course: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextSession {
    /// Bare day name, date suffix stripped.
    pub day: String,
    pub start: String,
    pub end: String,
    pub room: String,
    pub course: String,
}

/// One session as stored, for the `fullSchedule` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub time: String,
    pub course: String,
    pub room: String,
}

/// A class group's week keyed by bare day name, in stored order.
///
/// Day keys that share a bare name (two dated Mondays) are concatenated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullSchedule(Vec<(String, Vec<ScheduleEntry>)>);

impl FullSchedule {
    pub fn of(class: &ClassSchedule) -> Self {
        let mut days: Vec<(String, Vec<ScheduleEntry>)> = Vec::new();
        for day in &class.days {
            let name = bare_day(&day.key);
            let entries = day.sessions.iter().map(|s| ScheduleEntry {
                time: s.raw_time.clone(),
                course: s.raw_course.clone(),
                room: s.raw_room.clone(),
            });
            match days.iter_mut().find(|(existing, _)| existing == name) {
                Some((_, sessions)) => sessions.extend(entries),
                None => days.push((name.to_string(), entries.collect())),
            }
        }
        Self(days)
    }

    pub fn days(&self) -> &[(String, Vec<ScheduleEntry>)] {
        &self.0
    }

    pub fn day(&self, name: &str) -> Option<&[ScheduleEntry]> {
        self.0
            .iter()
            .find(|(day, _)| day == name)
            .map(|(_, sessions)| sessions.as_slice())
    }
}

impl Serialize for FullSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, sessions) in &self.0 {
            map.serialize_entry(day, sessions)?;
        }
        map.end()
    }
}

/// Result of a class-location query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationReport {
    /// The class code did not resolve to any class group.
    NoSchedule,
    #[serde(rename_all = "camelCase")]
    InSession {
        room: RoomInfo,
        session: SessionSpan,
        full_schedule: FullSchedule,
    },
    #[serde(rename_all = "camelCase")]
    NotInSession {
        next_session: Option<NextSession>,
        full_schedule: FullSchedule,
    },
}

/// Locate `class` at `target`. `None` means the class code did not resolve.
pub fn locate(class: Option<&ClassSchedule>, target: &LocateTarget) -> LocationReport {
    let Some(class) = class else {
        return LocationReport::NoSchedule;
    };

    let today: Vec<(&DaySchedule, &Session, TimeInterval)> = class
        .days
        .iter()
        .filter(|day| target.day.matches(&day.key))
        .flat_map(|day| day.sessions.iter().map(move |session| (day, session)))
        .filter_map(|(day, session)| session.interval.map(|interval| (day, session, interval)))
        .collect();

    let current = today
        .iter()
        .find(|(_, session, interval)| !session.course.is_free() && interval.contains(target.instant));

    if let Some((_, session, interval)) = current {
        tracing::debug!(class = %class.id, time = %session.raw_time, "class in session");
        return LocationReport::InSession {
            room: room_info(session),
            session: SessionSpan {
                start_instant: absolute(target, interval.start()),
                end_instant: absolute(target, interval.end()),
                course: session.raw_course.trim().to_string(),
            },
            full_schedule: FullSchedule::of(class),
        };
    }

    let resume = today
        .iter()
        .find(|(_, session, interval)| session.course.is_free() && interval.contains(target.instant))
        .map(|(_, _, interval)| interval.end())
        .unwrap_or(target.instant);

    let later_today = today.iter().find(|(_, session, interval)| {
        session.course.is_attendable() && interval.start() >= resume
    });

    let next = match later_today {
        Some(&(day, session, interval)) => Some(next_session(day, session, interval)),
        None => class.sessions().find_map(|(day, session)| {
            session
                .interval
                .filter(|_| session.course.is_attendable())
                .map(|interval| next_session(day, session, interval))
        }),
    };

    tracing::debug!(
        class = %class.id,
        resume = %format_minutes(resume),
        found = next.is_some(),
        "class not in session"
    );

    LocationReport::NotInSession {
        next_session: next,
        full_schedule: FullSchedule::of(class),
    }
}

fn next_session(day: &DaySchedule, session: &Session, interval: TimeInterval) -> NextSession {
    NextSession {
        day: bare_day(&day.key).to_string(),
        start: format_minutes(interval.start()),
        end: format_minutes(interval.end()),
        room: session.raw_room.trim().to_string(),
        course: session.raw_course.trim().to_string(),
    }
}

fn room_info(session: &Session) -> RoomInfo {
    let building = match &session.room {
        RoomRef::Physical(code) => building_of(code),
        RoomRef::Online | RoomRef::Unassigned => None,
    };
    RoomInfo {
        id: session.raw_room.trim().to_string(),
        building,
    }
}

/// The instant `minutes` after local midnight of the target date.
///
/// A local time skipped by a DST transition is read as UTC wall time.
fn absolute(target: &LocateTarget, minutes: Minutes) -> DateTime<FixedOffset> {
    let naive = target.date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes));
    target
        .tz
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| target.tz.from_utc_datetime(&naive))
        .fixed_offset()
}
