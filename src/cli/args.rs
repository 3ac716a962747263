//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::config_initialization::ConfigOverrides;

/// Options shared by the batch commands
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory to scan (default: configured working directory)
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Target language, three letters (ISO 639-2)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Actually modify files; without it every write is only logged
    #[arg(long)]
    pub apply: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn overrides(&self, config_file: Option<PathBuf>) -> ConfigOverrides {
        ConfigOverrides {
            config_file,
            working_directory: self.directory.clone(),
            language: self.language.clone(),
            apply: self.apply,
            temp_directory: None,
        }
    }
}

/// Arguments for the clean command
#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the convert command
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Directory for intermediate files (default: <DIR>/tmp)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,
}

impl ConvertArgs {
    pub fn overrides(&self, config_file: Option<PathBuf>) -> ConfigOverrides {
        ConfigOverrides {
            temp_directory: self.temp_dir.clone(),
            ..self.run.overrides(config_file)
        }
    }
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Matroska file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Target language, three letters (ISO 639-2)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    pub fn overrides(&self, config_file: Option<PathBuf>) -> ConfigOverrides {
        ConfigOverrides {
            config_file,
            language: self.language.clone(),
            ..ConfigOverrides::default()
        }
    }
}
