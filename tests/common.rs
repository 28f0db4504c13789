#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use labtally::core::registry::RegistryLogic;
use labtally::db::initialize::init_db;
use labtally::db::pool::DbPool;
use labtally::db::queries;
use labtally::models::location::Location;
use labtally::models::mac_address::NicType;
use labtally::models::os_type::OsType;
use labtally::models::workstation::Workstation;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const MAC_PC01: &str = "00:11:22:33:44:55";
pub const MAC_PC02: &str = "66-77-88-99-aa-bb";
pub const MAC_UNTRACKED: &str = "0a1b2c3d4e5f";

/// The binary with HOME pointed at a scratch directory, so no test ever
/// touches the real configuration.
pub fn lt() -> Command {
    let mut cmd = cargo_bin_cmd!("labtally");
    let home = env::temp_dir().join("labtally_test_home");
    fs::create_dir_all(&home).ok();
    cmd.env("HOME", home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_labtally.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh in-memory database with the full schema.
pub fn memory_db() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn add_location(pool: &DbPool, name: &str) -> Location {
    RegistryLogic::add_location(
        &pool.conn,
        name,
        hm(8, 0),
        hm(22, 0),
        chrono_tz::Europe::Rome,
    )
    .expect("add location")
}

/// A location with two tracked workstations, one untracked, and one OS.
pub struct Lab {
    pub location: Location,
    pub pc01: Workstation,
    pub pc02: Workstation,
    pub untracked: Workstation,
    pub os: OsType,
}

pub fn seed_lab(pool: &mut DbPool) -> Lab {
    let location = add_location(pool, "Main Lab");

    let pc01 = RegistryLogic::add_workstation(
        &mut pool.conn,
        &location,
        "PC-01",
        true,
        &[(MAC_PC01.to_string(), NicType::Ethernet)],
    )
    .expect("add PC-01");

    let pc02 = RegistryLogic::add_workstation(
        &mut pool.conn,
        &location,
        "PC-02",
        true,
        &[(MAC_PC02.to_string(), NicType::Wireless)],
    )
    .expect("add PC-02");

    let untracked = RegistryLogic::add_workstation(
        &mut pool.conn,
        &location,
        "PC-X",
        false,
        &[(MAC_UNTRACKED.to_string(), NicType::Other)],
    )
    .expect("add PC-X");

    let os = queries::get_or_create_os_type(&pool.conn, Some("windows"), Some("11"))
        .expect("os type")
        .expect("valid os name");

    Lab {
        location,
        pc01,
        pc02,
        untracked,
        os,
    }
}

/// Initialize a CLI database and register one location with one workstation.
pub fn init_cli_lab(db_path: &str) {
    lt().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    lt().args([
        "--db",
        db_path,
        "location",
        "add",
        "Main Lab",
        "--tz",
        "Europe/Rome",
    ])
    .assert()
    .success();

    lt().args([
        "--db",
        db_path,
        "workstation",
        "add",
        "PC-01",
        "--location",
        "main-lab",
        "--mac",
        MAC_PC01,
    ])
    .assert()
    .success();
}
