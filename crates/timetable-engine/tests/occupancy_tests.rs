//! Tests for the room occupancy partition.

use std::collections::BTreeSet;

use timetable_engine::building::BuildingFilter;
use timetable_engine::days::QueryDay;
use timetable_engine::occupancy::resolve_occupancy;
use timetable_engine::timeparse::parse_time_of_day;
use timetable_engine::{ClassSchedule, OccupancyReport, ScheduleDataset, Session};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn set(rooms: &[&str]) -> BTreeSet<String> {
    rooms.iter().map(|r| r.to_string()).collect()
}

fn query(dataset: &ScheduleDataset, day: &str, time: &str, building: Option<&str>) -> OccupancyReport {
    let day = QueryDay::parse(day);
    let instant = parse_time_of_day(time);
    let filter = BuildingFilter::parse(building);
    resolve_occupancy(dataset, day.as_ref(), instant, &filter)
}

fn campus() -> ScheduleDataset {
    ScheduleDataset::new(vec![
        ClassSchedule::new("2EM1")
            .with_day(
                "Lundi 10/02/2025",
                vec![
                    Session::new("09H:00-12H:15", "FREE", "X"),
                    Session::new("13H:30-16H:45", "MATH", "H410"),
                ],
            )
            .with_day(
                "Mardi 11/02/2025",
                vec![Session::new("09:00-12:15", "Physique\nMme Trabelsi", "A101")],
            ),
        ClassSchedule::new("4ERP-BI3").with_day(
            "Lundi 10/02/2025",
            vec![
                Session::new("09:00-12:15", "Big Data", "I104"),
                Session::new("09:00-10:30", "FREEWARNING", "J201"),
                Session::new("09:00-12:15", "Cloud", "En ligne"),
                Session::new("13:30-16:45", "NOT-FREE", "A101"),
            ],
        ),
        ClassSchedule::new("3A12").with_day(
            "Lundi 10/02/2025",
            vec![
                Session::new("09:00-12:15", "NOT-FREE", "K005"),
                Session::new("horaire inconnu", "Anglais", "B202"),
            ],
        ),
    ])
}

// ── Universe ────────────────────────────────────────────────────────────────

#[test]
fn universe_excludes_online_and_empty_rooms() {
    let dataset = ScheduleDataset::new(vec![
        ClassSchedule::new("1A1").with_day(
            "Lundi",
            vec![
                Session::new("09:00-10:00", "Algo", ""),
                Session::new("10:00-11:00", "Algo", "online"),
            ],
        ),
        ClassSchedule::new("1A2").with_day("Lundi", vec![Session::new("09:00-10:00", "Algo", "C300")]),
    ]);

    assert_eq!(dataset.room_universe(), &set(&["C300"]));
}

#[test]
fn rooms_of_unparseable_sessions_still_belong_to_the_universe() {
    let report = query(&campus(), "Lundi", "10:00", None);
    assert!(report.rooms.contains("B202"));
    assert!(report.empty.contains("B202"));
}

// ── Classification ──────────────────────────────────────────────────────────

#[test]
fn monday_morning_partition() {
    let report = query(&campus(), "Lundi", "09:30", None);

    assert_eq!(report.rooms, set(&["A101", "B202", "H410", "I104", "J201", "K005", "X"]));
    assert_eq!(report.occupied, set(&["I104", "K005"]));
    assert_eq!(report.warning, set(&["J201"]));
    assert_eq!(report.empty, set(&["A101", "B202", "H410", "X"]));
}

#[test]
fn free_session_leaves_its_room_empty() {
    let report = query(&campus(), "Monday", "09:30", None);
    assert!(report.empty.contains("X"));
    assert!(!report.occupied.contains("X"));
    assert!(!report.warning.contains("X"));
}

#[test]
fn not_free_marks_room_occupied_without_a_course_name() {
    let report = query(&campus(), "Lundi", "14:00", None);
    assert!(report.occupied.contains("A101"));
    assert!(report.occupied.contains("H410"));
}

#[test]
fn session_end_is_exclusive() {
    let dataset = campus();
    assert!(query(&dataset, "Lundi", "09:00", None).occupied.contains("I104"));
    assert!(query(&dataset, "Lundi", "12:14", None).occupied.contains("I104"));
    assert!(!query(&dataset, "Lundi", "12:15", None).occupied.contains("I104"));
    assert!(query(&dataset, "Lundi", "12:15", None).empty.contains("I104"));
}

#[test]
fn other_days_do_not_leak() {
    let report = query(&campus(), "Mardi", "09:30", None);
    assert_eq!(report.occupied, set(&["A101"]));
    assert!(report.warning.is_empty());
}

#[test]
fn dated_day_keys_match_bare_query_day() {
    let report = query(&campus(), "lundi", "10:00", None);
    assert!(report.occupied.contains("I104"));
}

#[test]
fn occupied_wins_over_warning_for_the_same_room() {
    let dataset = ScheduleDataset::new(vec![
        ClassSchedule::new("1A1").with_day("Jeudi", vec![Session::new("08:00-10:00", "FREEWARNING", "D1")]),
        ClassSchedule::new("1A2").with_day("Jeudi", vec![Session::new("08:00-10:00", "Réseaux", "D1")]),
    ]);
    let report = query(&dataset, "Jeudi", "09:00", None);
    assert_eq!(report.occupied, set(&["D1"]));
    assert!(report.warning.is_empty());
    assert!(report.empty.is_empty());
}

// ── Building filter ─────────────────────────────────────────────────────────

#[test]
fn building_filter_restricts_empty_and_warning() {
    let report = query(&campus(), "Lundi", "09:30", Some("A"));
    assert_eq!(report.empty, set(&["A101"]));
    assert!(report.warning.is_empty());
    assert!(report.occupied.is_empty());
    // The universe itself is never filtered.
    assert_eq!(report.rooms.len(), 7);
}

#[test]
fn i_j_k_filters_are_interchangeable() {
    let dataset = campus();
    let i = query(&dataset, "Lundi", "09:30", Some("I"));
    let j = query(&dataset, "Lundi", "09:30", Some("j"));
    let k = query(&dataset, "Lundi", "09:30", Some("K"));

    assert_eq!(i, j);
    assert_eq!(j, k);
    assert_eq!(i.occupied, set(&["I104", "K005"]));
    assert_eq!(i.warning, set(&["J201"]));
    assert!(i.empty.is_empty());
}

#[test]
fn unknown_filter_behaves_like_all() {
    let dataset = campus();
    let all = query(&dataset, "Lundi", "09:30", Some("all"));
    assert_eq!(query(&dataset, "Lundi", "09:30", Some("ALL")), all);
    assert_eq!(query(&dataset, "Lundi", "09:30", Some("bloc Z")), all);
    assert_eq!(query(&dataset, "Lundi", "09:30", None), all);
}

// ── Fallback ────────────────────────────────────────────────────────────────

#[test]
fn undetermined_time_reports_everything_empty() {
    let report = query(&campus(), "Lundi", "plus tard", None);
    assert_eq!(report.empty, report.rooms);
    assert!(report.occupied.is_empty());
    assert!(report.warning.is_empty());
}

#[test]
fn undetermined_day_reports_everything_empty() {
    let report = query(&campus(), "", "09:30", None);
    assert_eq!(report.empty, report.rooms);
    assert!(report.occupied.is_empty());
}

#[test]
fn fallback_still_honours_building_filter() {
    let report = query(&campus(), "", "09:30", Some("B"));
    assert_eq!(report.empty, set(&["B202"]));
}

// ── Partition ───────────────────────────────────────────────────────────────

#[test]
fn sets_partition_the_universe_at_every_quarter_hour() {
    let dataset = campus();
    for day in ["Lundi", "Mardi", "Mercredi"] {
        for quarter in 0..96u32 {
            let time = format!("{:02}:{:02}", quarter / 4, (quarter % 4) * 15);
            let report = query(&dataset, day, &time, None);

            assert!(report.occupied.is_disjoint(&report.empty), "{day} {time}");
            assert!(report.occupied.is_disjoint(&report.warning), "{day} {time}");
            assert!(report.empty.is_disjoint(&report.warning), "{day} {time}");

            let union: BTreeSet<String> = report
                .occupied
                .iter()
                .chain(&report.empty)
                .chain(&report.warning)
                .cloned()
                .collect();
            assert_eq!(union, report.rooms, "{day} {time}");
        }
    }
}
