//! WASM bindings for timetable-engine.
//!
//! Exposes the empty-room and class-location queries to the browser dashboard
//! via `wasm-bindgen`. The timetable and every result cross the boundary as
//! JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p timetable-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir dashboard/wasm/ \
//!   target/wasm32-unknown-unknown/release/timetable_wasm.wasm
//! ```
//!
//! The dashboard passes the current instant in explicitly (`nowIso`), so no
//! export reads the system clock.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use timetable_engine::{
    Engine, EngineConfig, FixedClock, LocationRequest, OccupancyRequest, ScheduleDataset,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 instant into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (`"2025-02-10T13:00:00Z"`, `"2025-02-10T14:00:00+01:00"`)
/// and a naive datetime, which is read as UTC.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

/// Decode the timetable and wrap it in an engine whose clock reads `now`.
fn engine(dataset_json: &str, timezone: Option<String>, now: DateTime<Utc>) -> Result<Engine, String> {
    let mut config = EngineConfig::default();
    if let Some(tz) = timezone {
        config.timezone = tz;
    }
    let dataset = ScheduleDataset::from_json(dataset_json, &config)
        .map_err(|e| format!("Invalid timetable JSON: {}", e))?;
    Engine::new(dataset, config, Arc::new(FixedClock(now))).map_err(|e| e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// Room occupancy and class resolution never read the clock.
const UNUSED_CLOCK: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

fn find_rooms_json(
    dataset_json: &str,
    day: &str,
    time: &str,
    building: Option<String>,
) -> Result<String, String> {
    let engine = engine(dataset_json, None, UNUSED_CLOCK)?;
    let report = engine.occupancy(&OccupancyRequest {
        day: Some(day.to_string()),
        time: Some(time.to_string()),
        building,
    });
    to_json(&report)
}

fn locate_class_json(
    dataset_json: &str,
    class_code: &str,
    day: Option<String>,
    time: Option<String>,
    now_iso: &str,
    timezone: Option<String>,
) -> Result<String, String> {
    let now = parse_instant(now_iso)?;
    let engine = engine(dataset_json, timezone, now)?;
    let report = engine.locate(&LocationRequest {
        class_code: class_code.to_string(),
        day,
        time,
    });
    to_json(&report)
}

fn resolve_class_json(dataset_json: &str, class_code: &str) -> Result<String, String> {
    let engine = engine(dataset_json, None, UNUSED_CLOCK)?;
    to_json(&engine.resolve(class_code))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Partition the timetable's rooms into occupied, empty, and warning sets.
///
/// Returns a JSON object `{rooms, occupied, empty, warning}` of sorted room
/// code arrays. `rooms` is always the whole universe; the other three are
/// restricted to `building` when given (I, J and K are searched together).
///
/// # Arguments
/// - `dataset_json` -- the timetable, class group → day → sessions
/// - `day` -- day name, English or French (e.g., "Lundi", "Monday")
/// - `time` -- time of day (e.g., "10:00", "10H:00")
/// - `building` -- optional building letter, or "all"
#[wasm_bindgen(js_name = "findRooms")]
pub fn find_rooms(
    dataset_json: &str,
    day: &str,
    time: &str,
    building: Option<String>,
) -> Result<String, JsValue> {
    find_rooms_json(dataset_json, day, time, building).map_err(|e| JsValue::from_str(&e))
}

/// Locate a class group: the session in progress, or the next one.
///
/// Returns a JSON object tagged by `status`: `in_session` (with `room`,
/// `session` and `fullSchedule`), `not_in_session` (with `nextSession` and
/// `fullSchedule`) or `no_schedule`.
///
/// # Arguments
/// - `dataset_json` -- the timetable
/// - `class_code` -- class code, possibly abbreviated (e.g., "4bi3")
/// - `day` -- optional day name; defaults to the weekday of `now_iso`
/// - `time` -- optional time or time range; defaults to the time of `now_iso`
/// - `now_iso` -- the current instant (ISO 8601)
/// - `timezone` -- optional IANA timezone of the timetable (default "Africa/Tunis")
#[wasm_bindgen(js_name = "locateClass")]
pub fn locate_class(
    dataset_json: &str,
    class_code: &str,
    day: Option<String>,
    time: Option<String>,
    now_iso: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    locate_class_json(dataset_json, class_code, day, time, now_iso, timezone)
        .map_err(|e| JsValue::from_str(&e))
}

/// Resolve a free-form class code to a timetable key.
///
/// Returns a JSON object tagged by `status`: `resolved` (with `key` and
/// `matchKind`), `no_digit`, `not_found` or `ambiguous` (with `candidates`).
#[wasm_bindgen(js_name = "resolveClass")]
pub fn resolve_class(dataset_json: &str, class_code: &str) -> Result<String, JsValue> {
    resolve_class_json(dataset_json, class_code).map_err(|e| JsValue::from_str(&e))
}
