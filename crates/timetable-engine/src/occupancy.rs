//! Room occupancy at one instant.
//!
//! Every physical room that appears anywhere in the dataset is either
//! occupied, in a warning state, or empty at a given (day, minute). Sessions
//! are treated as half-open intervals, so a room freed at 12:15 is empty at
//! 12:15.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::building::BuildingFilter;
use crate::dataset::{CourseKind, RoomRef, ScheduleDataset};
use crate::days::QueryDay;
use crate::timeparse::Minutes;

/// The three-way partition of the room universe at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    /// Every physical room in the dataset, unfiltered.
    pub rooms: BTreeSet<String>,
    pub occupied: BTreeSet<String>,
    pub empty: BTreeSet<String>,
    pub warning: BTreeSet<String>,
}

/// Classify every room for `day` at `instant`.
///
/// When either the day or the instant is unknown the whole (filtered)
/// universe is reported empty.
pub fn resolve_occupancy(
    dataset: &ScheduleDataset,
    day: Option<&QueryDay>,
    instant: Option<Minutes>,
    filter: &BuildingFilter,
) -> OccupancyReport {
    let universe = dataset.room_universe();

    let (Some(day), Some(instant)) = (day, instant) else {
        tracing::debug!("occupancy fallback: day or time undetermined");
        return OccupancyReport {
            rooms: universe.clone(),
            occupied: BTreeSet::new(),
            empty: filtered(universe.iter(), filter),
            warning: BTreeSet::new(),
        };
    };

    let mut occupied = BTreeSet::new();
    let mut warning = BTreeSet::new();

    let active = dataset
        .classes()
        .iter()
        .flat_map(|class| class.sessions())
        .filter(|(schedule_day, _)| day.matches(&schedule_day.key))
        .map(|(_, session)| session)
        .filter(|session| {
            session
                .interval
                .is_some_and(|interval| interval.contains(instant))
        });

    for session in active {
        let RoomRef::Physical(room) = &session.room else {
            continue;
        };
        match session.course {
            CourseKind::Free => {}
            CourseKind::FreeWarning => {
                warning.insert(room.clone());
            }
            CourseKind::NotFree | CourseKind::Scheduled { .. } => {
                occupied.insert(room.clone());
            }
        }
    }

    // A room both taken and flagged at the same instant is taken.
    let warning: BTreeSet<String> = warning.difference(&occupied).cloned().collect();

    let empty = universe
        .iter()
        .filter(|room| !occupied.contains(*room) && !warning.contains(*room));

    OccupancyReport {
        rooms: universe.clone(),
        empty: filtered(empty, filter),
        occupied: filtered(occupied.iter(), filter),
        warning: filtered(warning.iter(), filter),
    }
}

fn filtered<'a>(
    rooms: impl Iterator<Item = &'a String>,
    filter: &BuildingFilter,
) -> BTreeSet<String> {
    rooms
        .filter(|room| filter.admits(room))
        .cloned()
        .collect()
}
