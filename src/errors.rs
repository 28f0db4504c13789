//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Domain failures (unknown slug, unmapped application, invalid session end)
//! are NOT errors: the core signals them with `Option`/`bool` results and the
//! boundary layer turns them into a bad-request status.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0} (expected 1=Monday .. 7=Sunday)")]
    InvalidWeekday(u32),

    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),

    #[error("Invalid time zone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid OS type: {0}")]
    InvalidOsType(String),

    #[error("Invalid NIC type: {0}")]
    InvalidNic(String),

    // ---------------------------
    // Lookup / request errors
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
