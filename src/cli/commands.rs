//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, BatchReport, DefaultAppContainer};
use crate::cli::args::{CleanArgs, ConvertArgs, InspectArgs};
use crate::cli::{Cli, Commands};
use crate::config_initialization::{initialize_configuration_hierarchy, ConfigOverrides};
use crate::domain::model::NormalizeConfig;

/// Dispatch the parsed command line
pub async fn execute(cli: Cli) -> Result<()> {
    let config_file = cli.config;
    match cli.command {
        Commands::Clean(args) => clean(args, config_file).await,
        Commands::Convert(args) => convert(args, config_file).await,
        Commands::Inspect(args) => inspect(args, config_file).await,
    }
}

fn resolve(overrides: &ConfigOverrides) -> Result<NormalizeConfig> {
    initialize_configuration_hierarchy(overrides, |name| std::env::var(name).ok())
        .context("Failed to resolve configuration")
}

/// Execute the clean command
pub async fn clean(args: CleanArgs, config_file: Option<PathBuf>) -> Result<()> {
    info!("Starting clean operation");
    let config = resolve(&args.run.overrides(config_file))?;
    let container = DefaultAppContainer::new(config);

    let report = container
        .orchestrator()
        .run(container.clean_interactor().as_ref())
        .await
        .context("Language cleanup could not start")?;
    print_report(&report, args.run.json)
}

/// Execute the convert command
pub async fn convert(args: ConvertArgs, config_file: Option<PathBuf>) -> Result<()> {
    info!("Starting convert operation");
    let config = resolve(&args.overrides(config_file))?;
    let container = DefaultAppContainer::new(config);

    let report = container
        .orchestrator()
        .run(container.convert_interactor().as_ref())
        .await
        .context("Audio conversion could not start")?;
    print_report(&report, args.run.json)
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, config_file: Option<PathBuf>) -> Result<()> {
    info!("Starting inspect operation");
    info!("Input: {}", args.file.display());

    if !args.file.is_file() {
        return Err(anyhow::anyhow!(
            "Input file does not exist: {}",
            args.file.display()
        ));
    }

    let config = resolve(&args.overrides(config_file))?;
    let container = DefaultAppContainer::new(config);
    let response = container
        .inspect_interactor()
        .inspect_file(&args.file)
        .await
        .context("Failed to inspect input file")?;

    if args.json {
        let json = serde_json::to_string_pretty(&response)
            .context("Failed to serialize inspection to JSON")?;
        println!("{}", json);
    } else {
        print!("{}", response.render_text());
    }

    info!("Inspect operation completed successfully");
    Ok(())
}

/// Per-file failures never change the exit status; the report carries them
fn print_report(report: &BatchReport, json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(report)
            .context("Failed to serialize batch report to JSON")?;
        println!("{}", json);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}
