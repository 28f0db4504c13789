use chrono::TimeDelta;
use labtally::core::filter::SessionFilter;
use labtally::core::session::SessionLogic;
use labtally::db::log::load_entries;
use labtally::db::sessions;
use rusqlite::Connection;

mod common;
use common::{at, memory_db, seed_lab};

fn open_sessions(conn: &Connection, workstation_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sessions WHERE workstation_id = ?1 AND end_ts IS NULL",
        [workstation_id],
        |row| row.get(0),
    )
    .unwrap()
}

fn all_sessions(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn start_without_workstation_or_os_creates_nothing() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    let now = at(2024, 3, 4, 9, 0, 0);

    let s = SessionLogic::start_session_at(&mut pool.conn, None, Some(&lab.os), now).unwrap();
    assert!(s.is_none());

    let s = SessionLogic::start_session_at(&mut pool.conn, Some(&lab.pc01), None, now).unwrap();
    assert!(s.is_none());

    assert_eq!(all_sessions(&pool.conn), 0);
}

#[test]
fn start_opens_session_with_derived_fields() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    let s = SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 9, 15, 30),
    )
    .unwrap()
    .expect("session opened");

    assert!(s.is_open());
    assert_eq!(s.workstation_id, lab.pc01.id);
    assert_eq!(s.os_type_id, lab.os.id);
    assert_eq!(s.start_date.to_string(), "2024-03-04");
    assert_eq!(s.start_time.to_string(), "09:15:30");
    assert!(s.end_date.is_none() && s.end_time.is_none());
}

#[test]
fn second_start_replaces_open_session() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    let first = SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 9, 0, 0),
    )
    .unwrap()
    .unwrap();
    let second = SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 10, 0, 0),
    )
    .unwrap()
    .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(open_sessions(&pool.conn, lab.pc01.id), 1);
    assert!(sessions::session_by_id(&pool.conn, first.id).unwrap().is_none());

    let discards = load_entries(&pool.conn, Some("discard"), None).unwrap();
    assert_eq!(discards.len(), 1);
    assert_eq!(discards[0].target, "PC-01");
}

#[test]
fn starting_one_workstation_leaves_others_alone() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    let now = at(2024, 3, 4, 9, 0, 0);

    SessionLogic::start_session_at(&mut pool.conn, Some(&lab.pc01), Some(&lab.os), now).unwrap();
    SessionLogic::start_session_at(&mut pool.conn, Some(&lab.pc02), Some(&lab.os), now).unwrap();

    assert_eq!(open_sessions(&pool.conn, lab.pc01.id), 1);
    assert_eq!(open_sessions(&pool.conn, lab.pc02.id), 1);
}

#[test]
fn end_without_open_session_is_absent() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    let s = SessionLogic::end_session_at(&mut pool.conn, &lab.pc01, &[], 0, at(2024, 3, 4, 9, 0, 0))
        .unwrap();
    assert!(s.is_none());
    assert_eq!(all_sessions(&pool.conn), 0);
}

#[test]
fn end_closes_session_and_applies_offset() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 9, 0, 0),
    )
    .unwrap();

    let closed = SessionLogic::end_session_at(
        &mut pool.conn,
        &lab.pc01,
        &[],
        -600,
        at(2024, 3, 4, 10, 0, 0),
    )
    .unwrap()
    .expect("session closed");

    assert_eq!(closed.end, Some(at(2024, 3, 4, 9, 50, 0)));
    assert_eq!(closed.end_date.unwrap().to_string(), "2024-03-04");
    assert_eq!(closed.end_time.unwrap().to_string(), "09:50:00");
    assert_eq!(closed.duration().unwrap().num_seconds(), 50 * 60);
    assert_eq!(open_sessions(&pool.conn, lab.pc01.id), 0);
}

#[test]
fn end_not_after_start_deletes_session() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    let opened = SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 9, 0, 0),
    )
    .unwrap()
    .unwrap();

    // clock skew pushes the end before the start
    let s = SessionLogic::end_session_at(
        &mut pool.conn,
        &lab.pc01,
        &[],
        -3600,
        at(2024, 3, 4, 9, 30, 0),
    )
    .unwrap();
    assert!(s.is_none());
    assert!(sessions::session_by_id(&pool.conn, opened.id).unwrap().is_none());

    // equal timestamps are rejected too
    SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 11, 0, 0),
    )
    .unwrap();
    let s = SessionLogic::end_session_at(&mut pool.conn, &lab.pc01, &[], 0, at(2024, 3, 4, 11, 0, 0))
        .unwrap();
    assert!(s.is_none());
    assert_eq!(all_sessions(&pool.conn), 0);
}

#[test]
fn end_within_the_start_second_keeps_session() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    let start = at(2024, 3, 4, 9, 0, 0) + TimeDelta::milliseconds(200);
    let now = at(2024, 3, 4, 9, 0, 0) + TimeDelta::milliseconds(900);

    let opened =
        SessionLogic::start_session_at(&mut pool.conn, Some(&lab.pc01), Some(&lab.os), start)
            .unwrap()
            .unwrap();
    assert_eq!(opened.start, start);

    let closed = SessionLogic::end_session_at(&mut pool.conn, &lab.pc01, &[], 0, now)
        .unwrap()
        .unwrap();
    assert_eq!(closed.id, opened.id);
    assert_eq!(closed.end, Some(now));
    assert_eq!(closed.duration().unwrap(), TimeDelta::milliseconds(700));

    let stored = sessions::session_by_id(&pool.conn, opened.id).unwrap().unwrap();
    assert!(!stored.is_open());
}

#[test]
fn end_picks_latest_started_open_session() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    // two open sessions can only come from an older, unguarded writer
    let older = sessions::insert_session(&pool.conn, lab.pc01.id, lab.os.id, &at(2024, 3, 4, 8, 0, 0))
        .unwrap();
    let newer = sessions::insert_session(&pool.conn, lab.pc01.id, lab.os.id, &at(2024, 3, 4, 9, 0, 0))
        .unwrap();

    let closed =
        SessionLogic::end_session_at(&mut pool.conn, &lab.pc01, &[], 0, at(2024, 3, 4, 10, 0, 0))
            .unwrap()
            .unwrap();

    assert_eq!(closed.id, newer);
    assert!(sessions::session_by_id(&pool.conn, older).unwrap().unwrap().is_open());
}

#[test]
fn listing_is_ordered_by_start_and_skips_untracked() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    for (ws, h) in [(&lab.pc02, 11), (&lab.pc01, 9), (&lab.untracked, 10)] {
        sessions::insert_session(&pool.conn, ws.id, lab.os.id, &at(2024, 3, 4, h, 0, 0)).unwrap();
    }

    let list = SessionLogic::filter_sessions(&pool.conn, &SessionFilter::default()).unwrap();
    let hours: Vec<String> = list.iter().map(|s| s.start_time.to_string()).collect();
    assert_eq!(hours, vec!["09:00:00", "11:00:00"]);

    assert_eq!(
        SessionLogic::count_sessions(&pool.conn, &SessionFilter::for_location(lab.location.id))
            .unwrap(),
        2
    );
}

#[test]
fn active_and_first_session_lookups() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);

    assert!(
        SessionLogic::first_session_date_for_location(&pool.conn, lab.location.id)
            .unwrap()
            .is_none()
    );

    SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 2, 1, 9, 0, 0),
    )
    .unwrap();
    SessionLogic::end_session_at(&mut pool.conn, &lab.pc01, &[], 0, at(2024, 2, 1, 10, 0, 0))
        .unwrap();
    SessionLogic::start_session_at(
        &mut pool.conn,
        Some(&lab.pc01),
        Some(&lab.os),
        at(2024, 3, 4, 9, 0, 0),
    )
    .unwrap();

    let first = SessionLogic::first_session_date_for_location(&pool.conn, lab.location.id)
        .unwrap()
        .unwrap();
    assert_eq!(first.to_string(), "2024-02-01");

    let active = SessionLogic::active_session_for_workstation(&pool.conn, lab.pc01.id)
        .unwrap()
        .unwrap();
    assert_eq!(active.start, at(2024, 3, 4, 9, 0, 0));
    assert!(
        SessionLogic::active_session_for_workstation(&pool.conn, lab.pc02.id)
            .unwrap()
            .is_none()
    );

    let open = SessionLogic::open_for_location(&pool.conn, lab.location.id).unwrap();
    assert_eq!(open.len(), 1);
}
