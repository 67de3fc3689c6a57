pub mod busy;
pub mod config;
pub mod format;
pub mod platform;
