//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

pub use time::format_elapsed;
