use labtally::core::account::{AllowAll, IgnoredAccounts};
use labtally::core::api::{
    self, CreateSessionRequest, EndSessionRequest, Status, current_usage, location_activity,
    location_info,
};
use labtally::core::registry::RegistryLogic;
use labtally::db::{applications, queries};
use labtally::db::pool::DbPool;

mod common;
use common::{MAC_PC01, MAC_PC02, MAC_UNTRACKED, memory_db, seed_lab};

fn start(pool: &mut DbPool, mac: &str, os: &str, user: Option<&str>) -> Status {
    let req = CreateSessionRequest {
        mac: mac.into(),
        os_type: os.into(),
        os_version: Some("11".into()),
        user: user.map(Into::into),
    };
    api::create_session(&mut pool.conn, &req, &IgnoredAccounts::new(["Administrator"])).unwrap()
}

fn end(pool: &mut DbPool, mac: &str, apps: &str, offset: i64) -> Status {
    let req = EndSessionRequest {
        mac: mac.into(),
        apps: apps.into(),
        offset,
    };
    api::end_session(&mut pool.conn, &req).unwrap()
}

#[test]
fn create_session_by_any_mac_notation() {
    let mut pool = memory_db();
    seed_lab(&mut pool);

    assert_eq!(start(&mut pool, "00-11-22-33-44-55", "windows", Some("alice")), Status::Created);
    assert_eq!(start(&mut pool, "66:77:88:99:AA:BB", "Linux", None), Status::Created);
}

#[test]
fn create_session_rejections() {
    let mut pool = memory_db();
    seed_lab(&mut pool);

    assert_eq!(start(&mut pool, "ff:ff:ff:ff:ff:ff", "windows", None), Status::BadRequest);
    assert_eq!(start(&mut pool, "not-a-mac", "windows", None), Status::BadRequest);
    assert_eq!(start(&mut pool, MAC_UNTRACKED, "windows", None), Status::BadRequest);
    assert_eq!(start(&mut pool, MAC_PC01, "beos", None), Status::BadRequest);
    assert_eq!(
        start(&mut pool, MAC_PC01, "windows", Some("administrator")),
        Status::BadRequest
    );

    let n: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn allow_all_accepts_every_account() {
    let mut pool = memory_db();
    seed_lab(&mut pool);

    let req = CreateSessionRequest {
        mac: MAC_PC01.into(),
        os_type: "osx".into(),
        os_version: None,
        user: Some("Administrator".into()),
    };
    let status = api::create_session(&mut pool.conn, &req, &AllowAll).unwrap();
    assert_eq!(status, Status::Created);
}

#[test]
fn end_session_records_reported_apps() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    RegistryLogic::map_application(
        &mut pool.conn,
        &lab.location,
        "Word",
        &["WINWORD.EXE".to_string()],
    )
    .unwrap();

    assert_eq!(start(&mut pool, MAC_PC01, "windows", None), Status::Created);

    // end one minute in the future keeps end > start regardless of clock speed
    let apps = "WINWORD.EXE#2024-03-04T10:00:00#2024-03-04T10:00:30,\
                WINWORD.EXE#2024-03-04T11:00:00#2024-03-04T11:00:45,\
                Notepad#0#0";
    assert_eq!(end(&mut pool, MAC_PC01, apps, 60), Status::Ok);

    let session_id: i64 = pool
        .conn
        .query_row("SELECT id FROM sessions", [], |row| row.get(0))
        .unwrap();
    let uses = applications::usage_for_session(&pool.conn, session_id).unwrap();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].duration, 75);
}

#[test]
fn end_session_rejections() {
    let mut pool = memory_db();
    seed_lab(&mut pool);

    // nothing open yet
    assert_eq!(end(&mut pool, MAC_PC01, "", 60), Status::BadRequest);

    assert_eq!(start(&mut pool, MAC_PC01, "windows", None), Status::Created);
    assert_eq!(end(&mut pool, MAC_PC01, "Word#yesterday#today", 60), Status::BadRequest);
    assert_eq!(end(&mut pool, "ff:ff:ff:ff:ff:ff", "", 60), Status::BadRequest);

    // malformed requests leave the session open
    assert!(queries::trackable_by_mac(&pool.conn, MAC_PC01).unwrap().is_some());
    assert_eq!(end(&mut pool, MAC_PC01, "", 60), Status::Ok);
}

#[test]
fn end_before_start_is_bad_request() {
    let mut pool = memory_db();
    seed_lab(&mut pool);

    assert_eq!(start(&mut pool, MAC_PC01, "windows", None), Status::Created);
    assert_eq!(end(&mut pool, MAC_PC01, "", -3600), Status::BadRequest);
}

#[test]
fn current_usage_lists_tracked_workstations() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    assert_eq!(start(&mut pool, MAC_PC02, "windows", None), Status::Created);

    let usage = current_usage(&pool.conn, &lab.location.slug)
        .unwrap()
        .expect("known slug");
    assert_eq!(usage.workstations.len(), 2);

    let pc01 = &usage.workstations[0];
    assert_eq!(pc01.name, "PC-01");
    assert_eq!(pc01.mac_addresses[0].address, "00:11:22:33:44:55");
    assert_eq!(pc01.mac_addresses[0].nic_type, "ethernet");
    assert!(pc01.session_start.is_none());

    let pc02 = &usage.workstations[1];
    assert_eq!(pc02.mac_addresses[0].address, "66:77:88:99:AA:BB");
    let started = pc02.session_start.as_deref().expect("open session");
    assert!(started.ends_with("+01:00") || started.ends_with("+02:00"));

    let json = serde_json::to_value(&usage).unwrap();
    assert_eq!(json["workstations"][0]["mac_addresses"][0]["type"], "ethernet");
    assert!(json["workstations"][0]["session_start"].is_null());

    assert!(current_usage(&pool.conn, "nowhere").unwrap().is_none());
}

#[test]
fn location_info_counts_free_workstations() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    assert_eq!(start(&mut pool, MAC_PC01, "windows", None), Status::Created);

    let info = location_info(&pool.conn, &lab.location.slug).unwrap().unwrap();
    assert_eq!(info.name, "Main Lab");
    assert_eq!(info.total_workstations, 2);
    assert_eq!(info.open_workstations, 1);

    assert!(location_info(&pool.conn, "nowhere").unwrap().is_none());
}

#[test]
fn location_activity_counts_sessions_in_window() {
    let mut pool = memory_db();
    let lab = seed_lab(&mut pool);
    let slug = lab.location.slug.clone();

    assert_eq!(start(&mut pool, MAC_PC01, "windows", None), Status::Created);
    assert_eq!(end(&mut pool, MAC_PC01, "", 60), Status::Ok);
    assert_eq!(start(&mut pool, MAC_PC02, "windows", None), Status::Created);

    let all = location_activity(&pool.conn, &slug, None, None).unwrap().unwrap();
    assert_eq!(all.total_users, 2);

    let future = location_activity(&pool.conn, &slug, Some("2999-01-01T00:00:00"), None)
        .unwrap()
        .unwrap();
    assert_eq!(future.total_users, 0);

    assert!(location_activity(&pool.conn, &slug, Some("soon"), None).unwrap().is_none());
    assert!(location_activity(&pool.conn, "nowhere", None, None).unwrap().is_none());
}
