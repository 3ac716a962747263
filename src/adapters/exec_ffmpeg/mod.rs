//! FFmpeg invocation builder
//!
//! Audio conversion is delegated to the `ffmpeg` binary.

use std::path::{Path, PathBuf};

use crate::domain::model::{KnownAudioCodec, TranscodeSettings};
use crate::ports::*;

/// Builder for ffmpeg audio conversions
#[derive(Debug, Clone)]
pub struct FFmpegTool {
    program: PathBuf,
}

impl FFmpegTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `ffmpeg -y -i <src> -acodec <codec> -ac <channels> -ab <bitrate> <dest>`
    pub fn convert_audio(
        &self,
        source: &Path,
        codec: KnownAudioCodec,
        channels: u8,
        bitrate: &str,
        destination: &Path,
    ) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Ffmpeg, &self.program, ToolEffect::Write)
            .arg("-y")
            .flag("-i", source)
            .flag("-acodec", codec.encoder())
            .flag("-ac", channels.to_string())
            .flag("-ab", bitrate)
            .arg(destination)
    }

    /// Conversion using the configured transcode settings
    pub fn convert_with(
        &self,
        settings: &TranscodeSettings,
        source: &Path,
        destination: &Path,
    ) -> ToolInvocation {
        self.convert_audio(
            source,
            settings.target_codec,
            settings.channels,
            &settings.bitrate,
            destination,
        )
    }
}
