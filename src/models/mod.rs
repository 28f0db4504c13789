pub mod application;
pub mod layout;
pub mod location;
pub mod mac_address;
pub mod os_type;
pub mod session;
pub mod workstation;
