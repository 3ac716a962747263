// Resolved runtime configuration, passed by reference into every component

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::{KnownAudioCodec, LanguageCode};

/// Immutable configuration for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Root directory scanned for candidate files
    pub working_directory: PathBuf,
    /// Target language
    pub language: LanguageCode,
    /// Suppress every write (mux, extract, convert, replace, cleanup)
    pub dry_run: bool,
    /// Best first; ranks same-language audio and picks the conversion source
    pub audio_codec_priority: Vec<String>,
    pub transcode: TranscodeSettings,
    pub tools: ToolPaths,
}

/// Settings for the audio conversion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeSettings {
    pub target_codec: KnownAudioCodec,
    /// Output channel count (6 = 5.1)
    pub channels: u8,
    /// Bitrate passed to the encoder, e.g. `640k`
    pub bitrate: String,
    /// Directory for intermediates; `<working_directory>/tmp` when unset
    pub temp_directory: Option<PathBuf>,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            target_codec: KnownAudioCodec::Ac3,
            channels: 6,
            bitrate: "640k".to_string(),
            temp_directory: None,
        }
    }
}

/// Locations of the external tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub mkvmerge: PathBuf,
    pub mkvinfo: PathBuf,
    pub mkvextract: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            mkvmerge: PathBuf::from("mkvmerge"),
            mkvinfo: PathBuf::from("mkvinfo"),
            mkvextract: PathBuf::from("mkvextract"),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

pub const DEFAULT_LANGUAGE: &str = "eng";

pub fn default_codec_priority() -> Vec<String> {
    KnownAudioCodec::ALL
        .iter()
        .map(|codec| codec.codec_id().to_string())
        .collect()
}

impl NormalizeConfig {
    /// Defaults for a given working directory
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            language: LanguageCode(DEFAULT_LANGUAGE.to_string()),
            dry_run: true,
            audio_codec_priority: default_codec_priority(),
            transcode: TranscodeSettings::default(),
            tools: ToolPaths::default(),
        }
    }

    /// Directory holding pipeline intermediates
    pub fn temp_directory(&self) -> PathBuf {
        self.transcode
            .temp_directory
            .clone()
            .unwrap_or_else(|| self.working_directory.join("tmp"))
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.audio_codec_priority.is_empty() {
            return Err(DomainError::InvalidConfig(
                "audio_codec_priority must list at least one codec".to_string(),
            ));
        }
        if self
            .audio_codec_priority
            .iter()
            .any(|codec| codec.trim().is_empty())
        {
            return Err(DomainError::InvalidConfig(
                "audio_codec_priority contains an empty codec id".to_string(),
            ));
        }
        if self.transcode.channels == 0 {
            return Err(DomainError::InvalidConfig(
                "transcode.channels must be positive".to_string(),
            ));
        }
        if self.transcode.bitrate.trim().is_empty() {
            return Err(DomainError::InvalidConfig(
                "transcode.bitrate cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
