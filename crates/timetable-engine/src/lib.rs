//! # timetable-engine
//!
//! Room occupancy and class location queries over a weekly timetable.
//!
//! The engine reads a timetable export (class group → day → sessions) once,
//! decodes every session's time range, sentinel course token and room, and
//! then answers two questions against that immutable snapshot:
//!
//! - which rooms are occupied, empty or flagged at a given day and time,
//!   optionally within one building;
//! - where a class group is right now, or where it goes next.
//!
//! ## Modules
//!
//! - [`timeparse`]: `"09H:00"` / `"09:00-12:15"` → minutes and half-open intervals
//! - [`building`]: building letters and filters (I, J, K form one zone)
//! - [`occupancy`]: occupied / empty / warning partition of the room universe
//! - [`resolver`]: free-form class codes → dataset keys
//! - [`locator`]: current or next session of a class group
//! - [`dataset`]: the decoded timetable and its JSON loader
//! - [`snapshot`]: atomically swappable dataset snapshots
//! - [`query`]: request/response types and the [`Engine`] facade
//! - [`clock`]: injectable clock
//! - [`days`], [`text`]: day-name and accent-insensitive matching helpers
//! - [`config`], [`error`]: configuration and error types

pub mod building;
pub mod clock;
pub mod config;
pub mod dataset;
pub mod days;
pub mod error;
pub mod locator;
pub mod occupancy;
pub mod query;
pub mod resolver;
pub mod snapshot;
pub mod text;
pub mod timeparse;

pub use building::{normalize, BuildingFilter};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use dataset::{ClassSchedule, CourseKind, RoomRef, ScheduleDataset, Session};
pub use error::TimetableError;
pub use locator::{locate, LocationReport};
pub use occupancy::{resolve_occupancy, OccupancyReport};
pub use query::{Engine, LocationRequest, OccupancyRequest, ResolutionReport};
pub use resolver::{resolve_class_code, AmbiguityPolicy, MatchKind};
pub use timeparse::{parse_range, parse_time_of_day, TimeInterval};
