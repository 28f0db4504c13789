pub mod colors;
pub mod date;
pub mod formatting;
pub mod slug;
pub mod table;
pub mod time;

pub use formatting::secs2readable;
