pub mod applications;
pub mod initialize;
pub mod layout;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod sessions;
pub mod stats;
