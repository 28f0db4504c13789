//! Which local accounts may have their sessions recorded.

use crate::config::Config;
use crate::models::workstation::Workstation;

pub trait AccountFilter {
    fn is_user_loggable(&self, user: Option<&str>, workstation: &Workstation) -> bool;
}

/// Record every account.
pub struct AllowAll;

impl AccountFilter for AllowAll {
    fn is_user_loggable(&self, _user: Option<&str>, _workstation: &Workstation) -> bool {
        true
    }
}

/// Skip a fixed list of accounts (admin, kiosk and service users).
/// Matching is case-insensitive; a missing user name is always logged.
pub struct IgnoredAccounts {
    names: Vec<String>,
}

impl IgnoredAccounts {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.ignored_accounts)
    }
}

impl AccountFilter for IgnoredAccounts {
    fn is_user_loggable(&self, user: Option<&str>, _workstation: &Workstation) -> bool {
        match user.map(|u| u.trim().to_lowercase()) {
            Some(u) if !u.is_empty() => !self.names.contains(&u),
            _ => true,
        }
    }
}
