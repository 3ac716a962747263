//! Matroska language normalizer library
//!
//! Probe parsing, track selection, remux planning and the DTS/TrueHD to AC3
//! transcode pipeline behind the `mkvnorm` binary. External tools
//! (mkvmerge, mkvinfo, mkvextract, ffmpeg) are reached through the ports in
//! [`ports`], so everything above the adapters can be driven by test doubles.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{FileOutcome, NormalizeConfig, SkipReason, Stage, Track, TrackSet};
pub use error::{NormalizeError, NormalizeResult};
