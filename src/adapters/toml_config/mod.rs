// TOML config adapter - Configuration file loading using TOML files

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::domain::model::*;
use crate::error::{NormalizeError, NormalizeResult};

/// Contents of a config file; every key is optional and only the keys that
/// are present override the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub working_directory: Option<PathBuf>,
    pub language: Option<LanguageCode>,
    pub dry_run: Option<bool>,
    pub audio_codec_priority: Option<Vec<String>>,
    #[serde(default)]
    pub transcode: TranscodeSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// `[transcode]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscodeSection {
    pub target_codec: Option<KnownAudioCodec>,
    pub channels: Option<u8>,
    pub bitrate: Option<String>,
    pub temp_directory: Option<PathBuf>,
}

/// `[tools]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    pub mkvmerge: Option<PathBuf>,
    pub mkvinfo: Option<PathBuf>,
    pub mkvextract: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
}

impl ConfigFile {
    /// Overlay the keys present in this file onto `config`
    pub fn apply_to(&self, config: &mut NormalizeConfig) {
        if let Some(directory) = &self.working_directory {
            config.working_directory = directory.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(dry_run) = self.dry_run {
            config.dry_run = dry_run;
        }
        if let Some(priority) = &self.audio_codec_priority {
            config.audio_codec_priority = priority.clone();
        }

        let transcode = &mut config.transcode;
        if let Some(codec) = self.transcode.target_codec {
            transcode.target_codec = codec;
        }
        if let Some(channels) = self.transcode.channels {
            transcode.channels = channels;
        }
        if let Some(bitrate) = &self.transcode.bitrate {
            transcode.bitrate = bitrate.clone();
        }
        if let Some(directory) = &self.transcode.temp_directory {
            transcode.temp_directory = Some(directory.clone());
        }

        let tools = &mut config.tools;
        for (slot, value) in [
            (&mut tools.mkvmerge, &self.tools.mkvmerge),
            (&mut tools.mkvinfo, &self.tools.mkvinfo),
            (&mut tools.mkvextract, &self.tools.mkvextract),
            (&mut tools.ffmpeg, &self.tools.ffmpeg),
        ] {
            if let Some(path) = value {
                *slot = path.clone();
            }
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse config text; `origin` is only used in error messages
    pub fn parse(content: &str, origin: &Path) -> NormalizeResult<ConfigFile> {
        toml::from_str(content).map_err(|source| NormalizeError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> NormalizeResult<ConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|source| NormalizeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&content, path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(file)
    }

    /// Default search locations, most specific first
    pub fn default_candidates(
        xdg_config_home: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(xdg) = xdg_config_home {
            candidates.push(xdg.join("mkvnorm").join("config.toml"));
        }
        if let Some(home) = home {
            candidates.push(home.join(".config").join("mkvnorm").join("config.toml"));
        }
        candidates.push(PathBuf::from("mkvnorm.toml"));
        candidates
    }
}
