//! Tests for current / next session lookup.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Africa::Tunis;
use timetable_engine::days::QueryDay;
use timetable_engine::locator::{locate, LocateTarget, LocationReport, NextSession, RoomInfo};
use timetable_engine::timeparse::parse_time_of_day;
use timetable_engine::{ClassSchedule, Session};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Monday 2025-02-10 at `time`, Tunis time.
fn monday_at(time: &str) -> LocateTarget {
    target("Lundi", time, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
}

fn target(day: &str, time: &str, date: NaiveDate) -> LocateTarget {
    LocateTarget {
        day: QueryDay::parse(day).unwrap(),
        instant: parse_time_of_day(time).unwrap(),
        date,
        tz: Tunis,
    }
}

fn class_2em1() -> ClassSchedule {
    ClassSchedule::new("2EM1")
        .with_day(
            "Lundi 10/02/2025",
            vec![
                Session::new("09H:00-12H:15", "FREE", "X"),
                Session::new("13H:30-16H:45", "MATH", "H410"),
            ],
        )
        .with_day(
            "Mercredi 12/02/2025",
            vec![
                Session::new("08H:30-10H:00", "NOT-FREE", "B12"),
                Session::new("10H:15-11H:45", "Anglais\nMme Gharbi", "En ligne"),
            ],
        )
}

fn next_of(report: LocationReport) -> Option<NextSession> {
    match report {
        LocationReport::NotInSession { next_session, .. } => next_session,
        other => panic!("expected not_in_session, got {:?}", other),
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn lunch_break_resumes_search_at_its_end() {
    let class = class_2em1();
    let next = next_of(locate(Some(&class), &monday_at("10:00")));

    assert_eq!(
        next,
        Some(NextSession {
            day: "Lundi".to_string(),
            start: "13:30".to_string(),
            end: "16:45".to_string(),
            room: "H410".to_string(),
            course: "MATH".to_string(),
        })
    );
}

#[test]
fn session_in_progress_is_reported_with_absolute_instants() {
    let class = class_2em1();
    let report = locate(Some(&class), &monday_at("14:00"));

    let LocationReport::InSession { room, session, full_schedule } = report else {
        panic!("expected in_session");
    };
    assert_eq!(
        room,
        RoomInfo {
            id: "H410".to_string(),
            building: Some('H'),
        }
    );
    assert_eq!(session.course, "MATH");
    assert_eq!(
        session.start_instant,
        Tunis.with_ymd_and_hms(2025, 2, 10, 13, 30, 0).unwrap().fixed_offset()
    );
    assert_eq!(session.end_instant.to_rfc3339(), "2025-02-10T16:45:00+01:00");
    assert_eq!(full_schedule.days().len(), 2);
}

#[test]
fn end_of_session_is_not_in_session() {
    let class = class_2em1();
    let next = next_of(locate(Some(&class), &monday_at("16:45")));
    // Nothing left later on Monday: the week's first attendable session,
    // even when it is earlier the same day.
    assert_eq!(next.map(|n| (n.day, n.start)), Some(("Lundi".to_string(), "13:30".to_string())));
}

#[test]
fn free_session_is_never_current() {
    let class = class_2em1();
    let report = locate(Some(&class), &monday_at("09:00"));
    assert!(matches!(report, LocationReport::NotInSession { .. }));
}

#[test]
fn before_first_session_points_at_it() {
    let class = ClassSchedule::new("1A1").with_day(
        "Jeudi",
        vec![
            Session::new("09:00-10:30", "Algo", "C1"),
            Session::new("10:45-12:15", "Web", "C2"),
        ],
    );
    let date = NaiveDate::from_ymd_opt(2025, 2, 13).unwrap();
    let next = next_of(locate(Some(&class), &target("Thursday", "08:00", date)));
    assert_eq!(next.map(|n| n.room), Some("C1".to_string()));
}

#[test]
fn gap_between_sessions_points_at_the_following_one() {
    let class = ClassSchedule::new("1A1").with_day(
        "Jeudi",
        vec![
            Session::new("09:00-10:30", "Algo", "C1"),
            Session::new("10:45-12:15", "Web", "C2"),
        ],
    );
    let date = NaiveDate::from_ymd_opt(2025, 2, 13).unwrap();
    let next = next_of(locate(Some(&class), &target("Jeudi", "10:30", date)));
    assert_eq!(next.map(|n| n.course), Some("Web".to_string()));
}

#[test]
fn not_free_is_skipped_as_next_session() {
    let class = class_2em1();
    let date = NaiveDate::from_ymd_opt(2025, 2, 12).unwrap();
    let next = next_of(locate(Some(&class), &target("Wednesday", "08:00", date)));
    assert_eq!(next.map(|n| (n.start, n.room)), Some(("10:15".to_string(), "En ligne".to_string())));
}

#[test]
fn online_session_in_progress_has_no_building() {
    let class = class_2em1();
    let date = NaiveDate::from_ymd_opt(2025, 2, 12).unwrap();
    let report = locate(Some(&class), &target("Mercredi", "11:00", date));
    let LocationReport::InSession { room, .. } = report else {
        panic!("expected in_session");
    };
    assert_eq!(room.id, "En ligne");
    assert_eq!(room.building, None);
}

#[test]
fn day_without_sessions_falls_back_to_first_session_of_week() {
    let class = class_2em1();
    let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
    let next = next_of(locate(Some(&class), &target("Vendredi", "09:00", date)));
    assert_eq!(next.map(|n| (n.day, n.start)), Some(("Lundi".to_string(), "13:30".to_string())));
}

#[test]
fn week_without_attendable_sessions_has_no_next() {
    let class = ClassSchedule::new("1A1").with_day(
        "Lundi",
        vec![
            Session::new("09:00-12:00", "FREE", "X"),
            Session::new("13:00-14:00", "NOT-FREE", "Y"),
            Session::new("??", "Algo", "Z"),
        ],
    );
    let next = next_of(locate(Some(&class), &monday_at("15:00")));
    assert_eq!(next, None);
}

#[test]
fn unparseable_sessions_are_never_current() {
    let class = ClassSchedule::new("1A1").with_day(
        "Lundi",
        vec![
            Session::new("9 heures", "Algo", "Z"),
            Session::new("11:00-12:00", "Web", "C2"),
        ],
    );
    let next = next_of(locate(Some(&class), &monday_at("09:30")));
    assert_eq!(next.map(|n| n.room), Some("C2".to_string()));
}

#[test]
fn unresolved_class_has_no_schedule() {
    assert_eq!(locate(None, &monday_at("10:00")), LocationReport::NoSchedule);
}

// ── Output shape ────────────────────────────────────────────────────────────

#[test]
fn full_schedule_merges_dated_keys_by_bare_day() {
    let class = ClassSchedule::new("1A1")
        .with_day("Lundi 03/02", vec![Session::new("09:00-10:00", "Algo", "C1")])
        .with_day("Mardi 04/02", vec![Session::new("09:00-10:00", "Web", "C2")])
        .with_day("Lundi 10/02", vec![Session::new("11:00-12:00", "BD", "C3")]);

    let report = locate(Some(&class), &monday_at("08:00"));
    let LocationReport::NotInSession { full_schedule, .. } = report else {
        panic!("expected not_in_session");
    };

    let names: Vec<&str> = full_schedule.days().iter().map(|(d, _)| d.as_str()).collect();
    assert_eq!(names, vec!["Lundi", "Mardi"]);
    let monday = full_schedule.day("Lundi").unwrap();
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[1].course, "BD");
}

#[test]
fn report_serializes_with_status_tag() {
    let class = class_2em1();

    let json = serde_json::to_value(locate(Some(&class), &monday_at("10:00"))).unwrap();
    assert_eq!(json["status"], "not_in_session");
    assert_eq!(json["nextSession"]["start"], "13:30");
    assert_eq!(json["fullSchedule"]["Lundi"][1]["room"], "H410");

    let json = serde_json::to_value(locate(Some(&class), &monday_at("14:00"))).unwrap();
    assert_eq!(json["status"], "in_session");
    assert_eq!(json["room"]["building"], "H");
    assert_eq!(json["session"]["startInstant"], "2025-02-10T13:30:00+01:00");

    let json = serde_json::to_value(locate(None, &monday_at("14:00"))).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "no_schedule" }));
}

#[test]
fn locating_is_deterministic() {
    let class = class_2em1();
    let target = monday_at("10:00");
    assert_eq!(locate(Some(&class), &target), locate(Some(&class), &target));
}
