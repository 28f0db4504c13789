use serde::Serialize;
use std::fmt;

/// Allowed operating system names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsName {
    Windows,
    Osx,
    Linux,
}

impl OsName {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Osx => "osx",
            OsName::Linux => "linux",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "windows" => Some(OsName::Windows),
            "osx" => Some(OsName::Osx),
            "linux" => Some(OsName::Linux),
            _ => None,
        }
    }

    /// Helper: accept the names clients commonly report.
    pub fn from_reported(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "windows" | "win" => Some(OsName::Windows),
            "osx" | "os x" | "mac os x" | "macos" | "mac" => Some(OsName::Osx),
            "linux" => Some(OsName::Linux),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OsName::Windows => "Windows",
            OsName::Osx => "OS X",
            OsName::Linux => "Linux",
        }
    }
}

/// An operating system that a machine can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsType {
    pub id: i64,
    pub name: OsName,
    pub version: Option<String>,
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}", self.name.label(), v),
            None => write!(f, "{}", self.name.label()),
        }
    }
}
