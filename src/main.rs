//! mkvnorm
//!
//! Batch tool for Matroska libraries: language cleanup of audio and subtitle
//! tracks, and conversion of the main DTS/TrueHD track to AC3. Runs in
//! dry-run mode unless `--apply` is given.
//!
//! # Usage
//!
//! ```bash
//! mkvnorm clean /media/movies --language eng
//! mkvnorm convert /media/convert --apply
//! mkvnorm inspect "/media/movies/Some Movie.mkv" --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mkv_normalize::cli::{commands, Cli};
use mkv_normalize::utils::logging::init_logging;

/// Main entry point for the mkvnorm CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.json_logs).context("Failed to initialize logging")?;
    info!("Starting mkvnorm {}", env!("CARGO_PKG_VERSION"));

    commands::execute(cli).await?;

    info!("mkvnorm completed successfully");
    Ok(())
}
