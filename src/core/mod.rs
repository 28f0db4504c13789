pub mod account;
pub mod api;
pub mod config;
pub mod filter;
pub mod location;
pub mod log;
pub mod overlay;
pub mod registry;
pub mod session;
pub mod usage;
