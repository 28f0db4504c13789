use chrono::Weekday;
use labtally::core::filter::SessionFilter;
use labtally::core::registry::RegistryLogic;
use labtally::core::session::SessionLogic;
use labtally::core::usage::UsageLogic;
use labtally::db::applications;
use labtally::db::initialize::init_db;
use labtally::db::pool::DbPool;
use labtally::models::session::Session;

mod common;
use common::{Lab, add_location, at, memory_db, seed_lab, setup_test_db};

fn closed_session(pool: &mut DbPool, lab: &Lab, day: u32, apps: &[(&str, i64)]) -> Session {
    SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, day, 9, 0, 0),
    )
    .unwrap();

    let apps: Vec<(String, i64)> = apps.iter().map(|(n, d)| (n.to_string(), *d)).collect();
    SessionLogic::end_session_at(&mut pool.conn, &lab.pc01, &apps, 0, at(2024, 3, day, 10, 0, 0))
        .unwrap()
        .expect("closed")
}

fn map_powerpoint(pool: &mut DbPool, lab: &Lab) -> i64 {
    RegistryLogic::map_application(
        &mut pool.conn,
        &lab.location,
        "PowerPoint",
        &["Microsoft PowerPoint".to_string(), "POWERPNT.EXE".to_string()],
    )
    .unwrap()
    .id
}

#[test]
fn repeated_reports_accumulate() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    let app_id = map_powerpoint(&mut pool, &lab);

    let s = closed_session(
        &mut pool,
        &lab,
        4,
        &[("Microsoft PowerPoint", 30), ("POWERPNT.EXE", 45)],
    );

    let uses = applications::usage_for_session(&pool.conn, s.id).unwrap();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].application_id, app_id);
    assert_eq!(uses[0].duration, 75);
}

#[test]
fn usage_from_two_connections_adds_up() {
    let db_path = setup_test_db("usage_two_connections");
    let mut first = DbPool::new(&db_path).unwrap();
    init_db(&first.conn).unwrap();
    let lab = seed_lab(&mut first);
    let app_id = map_powerpoint(&mut first, &lab);
    let s = closed_session(&mut first, &lab, 4, &[]);

    let second = DbPool::new(&db_path).unwrap();
    assert!(UsageLogic::log_usage(&first.conn, &s, "POWERPNT.EXE", 30).unwrap());
    assert!(UsageLogic::log_usage(&second.conn, &s, "Microsoft PowerPoint", 45).unwrap());
    assert!(UsageLogic::log_usage(&first.conn, &s, "POWERPNT.EXE", -10).unwrap());

    let uses = applications::usage_for_session(&second.conn, s.id).unwrap();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].application_id, app_id);
    assert_eq!(uses[0].duration, 75);

    assert_eq!(applications::add_usage(&second.conn, s.id, app_id, 5).unwrap(), 80);
}

#[test]
fn unmapped_names_are_dropped() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    map_powerpoint(&mut pool, &lab);

    let s = closed_session(&mut pool, &lab, 4, &[("Solitaire", 600)]);

    assert!(applications::usage_for_session(&pool.conn, s.id).unwrap().is_empty());
    assert!(!UsageLogic::log_usage(&pool.conn, &s, "Minesweeper", 10).unwrap());
    assert!(applications::usage_for_session(&pool.conn, s.id).unwrap().is_empty());
}

#[test]
fn reported_names_are_scoped_per_location() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    let other = add_location(&pool, "Annex");

    // mapped only at the other location
    RegistryLogic::map_application(
        &mut pool.conn,
        &other,
        "PowerPoint",
        &["Microsoft PowerPoint".to_string()],
    )
    .unwrap();

    let s = closed_session(&mut pool, &lab, 4, &[("Microsoft PowerPoint", 30)]);
    assert!(applications::usage_for_session(&pool.conn, s.id).unwrap().is_empty());
}

#[test]
fn negative_durations_count_as_zero() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    map_powerpoint(&mut pool, &lab);

    let s = closed_session(
        &mut pool,
        &lab,
        4,
        &[("Microsoft PowerPoint", -20), ("POWERPNT.EXE", 15)],
    );

    let uses = applications::usage_for_session(&pool.conn, s.id).unwrap();
    assert_eq!(uses[0].duration, 15);
}

#[test]
fn totals_and_listing_follow_session_filter() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    map_powerpoint(&mut pool, &lab);
    RegistryLogic::map_application(&mut pool.conn, &lab.location, "Firefox", &[]).unwrap();

    // 2024-03-04 is a Monday, 2024-03-05 a Tuesday
    closed_session(
        &mut pool,
        &lab,
        4,
        &[("Microsoft PowerPoint", 100), ("Firefox", 50)],
    );
    closed_session(&mut pool, &lab, 5, &[("POWERPNT.EXE", 200)]);

    let all = UsageLogic::usage_totals(&pool.conn, &SessionFilter::default()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].application, "PowerPoint");
    assert_eq!(all[0].sessions, 2);
    assert_eq!(all[0].duration, 300);
    assert_eq!(all[1].application, "Firefox");

    let mondays = SessionFilter {
        weekdays: vec![Weekday::Mon],
        ..SessionFilter::for_location(lab.location.id)
    };
    let uses = UsageLogic::all_for_filters(&pool.conn, &mondays).unwrap();
    assert_eq!(uses.len(), 2);
    assert_eq!(uses.iter().map(|u| u.duration).sum::<i64>(), 150);

    let tuesdays = SessionFilter {
        weekdays: vec![Weekday::Tue],
        ..SessionFilter::default()
    };
    let totals = UsageLogic::usage_totals(&pool.conn, &tuesdays).unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].duration, 200);
}

#[test]
fn deleting_a_session_removes_its_uses() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    map_powerpoint(&mut pool, &lab);

    let s = closed_session(&mut pool, &lab, 4, &[("Microsoft PowerPoint", 30)]);
    pool.conn
        .execute("DELETE FROM sessions WHERE id = ?1", [s.id])
        .unwrap();

    let left: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM application_uses", [], |row| row.get(0))
        .unwrap();
    assert_eq!(left, 0);
}
