//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::{debug, info};

use crate::adapters::{ConfigFile, TomlConfigAdapter};
use crate::domain::model::*;
use crate::error::{NormalizeError, NormalizeResult};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "MKVNORM_CONFIG";

/// Values given on the command line; `None` leaves lower layers in charge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub working_directory: Option<PathBuf>,
    pub language: Option<String>,
    /// `--apply`: disable dry-run
    pub apply: bool,
    pub temp_directory: Option<PathBuf>,
}

/// Resolve the configuration following precedence: CLI > Env > File > Defaults.
///
/// `env` looks up environment variables; pass `|name| std::env::var(name).ok()`
/// for the process environment.
pub fn initialize_configuration_hierarchy<F>(
    overrides: &ConfigOverrides,
    env: F,
) -> NormalizeResult<NormalizeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    // Step 1: defaults
    let mut config = NormalizeConfig::new(".");

    // Step 2: config file
    if let Some(file) = load_config_file(overrides, &env)? {
        file.apply_to(&mut config);
    }

    // Step 3: environment variables
    apply_environment_overrides(&mut config, &env)?;

    // Step 4: CLI arguments
    apply_cli_overrides(&mut config, overrides)?;

    config.validate()?;
    info!(
        "Configuration resolved: directory={}, language={}, dry_run={}",
        config.working_directory.display(),
        config.language,
        config.dry_run
    );
    Ok(config)
}

/// Explicit files (`--config`, then `$MKVNORM_CONFIG`) must load; default
/// locations are optional.
fn load_config_file(
    overrides: &ConfigOverrides,
    env: &impl Fn(&str) -> Option<String>,
) -> NormalizeResult<Option<ConfigFile>> {
    let explicit = overrides
        .config_file
        .clone()
        .or_else(|| env(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = explicit {
        return TomlConfigAdapter::load(&path).map(Some);
    }

    let candidates = TomlConfigAdapter::default_candidates(
        env("XDG_CONFIG_HOME").map(PathBuf::from),
        env("HOME").map(PathBuf::from),
    );
    match candidates.into_iter().find(|path| path.is_file()) {
        Some(path) => TomlConfigAdapter::load(&path).map(Some),
        None => {
            debug!("No configuration file found, using defaults");
            Ok(None)
        }
    }
}

fn apply_environment_overrides(
    config: &mut NormalizeConfig,
    env: &impl Fn(&str) -> Option<String>,
) -> NormalizeResult<()> {
    let mut env_overrides = 0;
    let mut lookup = |name: &str| {
        let value = env(name);
        if let Some(value) = &value {
            info!("Found environment override: {} = {}", name, value);
            env_overrides += 1;
        }
        value
    };

    if let Some(value) = lookup("MKVNORM_WORKING_DIRECTORY") {
        config.working_directory = PathBuf::from(value);
    }
    if let Some(value) = lookup("MKVNORM_LANGUAGE") {
        config.language = LanguageCode::parse(&value).map_err(|_| invalid("MKVNORM_LANGUAGE", &value))?;
    }
    if let Some(value) = lookup("MKVNORM_DRY_RUN") {
        config.dry_run = parse_bool(&value).ok_or_else(|| invalid("MKVNORM_DRY_RUN", &value))?;
    }
    if let Some(value) = lookup("MKVNORM_AUDIO_CODEC_PRIORITY") {
        config.audio_codec_priority = value
            .split(',')
            .map(|codec| codec.trim().to_string())
            .collect();
    }
    if let Some(value) = lookup("MKVNORM_TEMP_DIRECTORY") {
        config.transcode.temp_directory = Some(PathBuf::from(value));
    }
    if let Some(value) = lookup("MKVNORM_BITRATE") {
        config.transcode.bitrate = value;
    }
    if let Some(value) = lookup("MKVNORM_CHANNELS") {
        config.transcode.channels = value
            .trim()
            .parse()
            .map_err(|_| invalid("MKVNORM_CHANNELS", &value))?;
    }
    if let Some(value) = lookup("MKVNORM_MKVMERGE") {
        config.tools.mkvmerge = PathBuf::from(value);
    }
    if let Some(value) = lookup("MKVNORM_MKVINFO") {
        config.tools.mkvinfo = PathBuf::from(value);
    }
    if let Some(value) = lookup("MKVNORM_MKVEXTRACT") {
        config.tools.mkvextract = PathBuf::from(value);
    }
    if let Some(value) = lookup("MKVNORM_FFMPEG") {
        config.tools.ffmpeg = PathBuf::from(value);
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut NormalizeConfig, overrides: &ConfigOverrides) -> NormalizeResult<()> {
    if let Some(directory) = &overrides.working_directory {
        config.working_directory = directory.clone();
    }
    if let Some(language) = &overrides.language {
        config.language = LanguageCode::parse(language)?;
    }
    if overrides.apply {
        config.dry_run = false;
    }
    if let Some(directory) = &overrides.temp_directory {
        config.transcode.temp_directory = Some(directory.clone());
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, value: &str) -> NormalizeError {
    NormalizeError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    }
}
