//! CLI module for mkvnorm
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{CleanArgs, ConvertArgs, InspectArgs, RunArgs};

/// mkvnorm - Matroska language cleanup and audio normalization
///
/// Keeps only the tracks of one language, or converts the main DTS/TrueHD
/// track to AC3. Nothing is written unless `--apply` is given.
#[derive(Parser, Debug)]
#[command(name = "mkvnorm")]
#[command(about = "Matroska language cleanup and DTS/TrueHD to AC3 conversion")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep only the target language's audio and subtitle tracks (recursive)
    Clean(CleanArgs),
    /// Convert the main DTS/TrueHD track to AC3 (current directory level only)
    Convert(ConvertArgs),
    /// Show tracks and what clean/convert would do with one file
    Inspect(InspectArgs),
}
