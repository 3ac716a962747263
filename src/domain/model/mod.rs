// Domain models - Core types and data structures

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub mod config;

pub use config::{NormalizeConfig, ToolPaths, TranscodeSettings};

/// ISO 639-2 language code, always three lowercase ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a user-supplied language code (strict: exactly three letters)
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidLanguage(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Normalize a probe-reported language value to exactly three characters.
    ///
    /// Longer values are cut down to their first three characters; anything
    /// shorter, or not alphabetic, is treated as an absent language.
    pub fn normalize(raw: &str) -> Option<Self> {
        let prefix: String = raw.trim().chars().take(3).collect();
        Self::parse(&prefix).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Kind of media stream inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
    Other,
}

impl TrackKind {
    /// Map the kind keyword printed by mkvmerge
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "video" => TrackKind::Video,
            "audio" => TrackKind::Audio,
            "subtitles" | "subtitle" => TrackKind::Subtitle,
            _ => TrackKind::Other,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
            TrackKind::Subtitle => "subtitles",
            TrackKind::Other => "other",
        };
        f.write_str(keyword)
    }
}

/// One media stream inside a container, as reported by the probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track id assigned by the probing tool (not necessarily contiguous)
    pub id: u32,
    pub kind: TrackKind,
    /// Codec identifier exactly as printed by the probe (e.g. `A_DTS`)
    pub codec: String,
    pub language: Option<LanguageCode>,
    pub is_default: bool,
    pub is_forced: bool,
    pub name: Option<String>,
}

impl Track {
    pub fn new(id: u32, kind: TrackKind, codec: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            codec: codec.into(),
            language: None,
            is_default: false,
            is_forced: false,
            name: None,
        }
    }

    pub fn with_language(mut self, language: LanguageCode) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

}

/// All tracks of one file, in probe order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn audio(&self) -> impl Iterator<Item = &Track> {
        self.of_kind(TrackKind::Audio)
    }

    pub fn subtitles(&self) -> impl Iterator<Item = &Track> {
        self.of_kind(TrackKind::Subtitle)
    }

    pub fn video(&self) -> impl Iterator<Item = &Track> {
        self.of_kind(TrackKind::Video)
    }

    /// The single video track referenced by id when muxing
    pub fn primary_video(&self) -> Option<&Track> {
        self.video().next()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |track| track.kind == kind)
    }
}

impl FromIterator<Track> for TrackSet {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Tracks kept by the selection policy, default flags already assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    /// First entry is the default audio track
    pub kept_audio: Vec<Track>,
    /// Never default
    pub kept_subtitles: Vec<Track>,
}

impl SelectionResult {
    pub fn default_audio(&self) -> Option<&Track> {
        self.kept_audio.first()
    }
}

/// Decision of the selection policy for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Selection {
    /// Only one language is present; the file is passed through untouched
    NoActionNeeded,
    /// No audio track carries the target language
    LanguageNotPresent,
    /// Remux with exactly these tracks
    Apply(SelectionResult),
}

/// Which tracks of one kind an input contributes to the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFilter {
    /// No directive; the mux tool keeps every track of this kind
    All,
    /// Keep exactly these ids, in this order
    Only(Vec<u32>),
    /// Explicitly carry no track of this kind
    None,
}

/// Default-flag assignment for one kept track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefaultTrackDirective {
    pub track_id: u32,
    pub is_default: bool,
}

/// Header compression scheme for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
}

impl Compression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
        }
    }
}

/// Audio/video sync offset, taken verbatim from the timestamp export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOffset(String);

impl SyncOffset {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-track metadata overrides applied while muxing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrackOverride {
    pub track_id: u32,
    pub language: Option<LanguageCode>,
    pub name: Option<String>,
    pub sync: Option<SyncOffset>,
    pub compression: Option<Compression>,
}

impl TrackOverride {
    pub fn new(track_id: u32) -> Self {
        Self {
            track_id,
            ..Self::default()
        }
    }
}

/// One source file handed to the mux tool, with its track directives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuxInput {
    pub source: PathBuf,
    pub video: TrackFilter,
    pub audio: TrackFilter,
    pub subtitles: TrackFilter,
    pub default_tracks: Vec<DefaultTrackDirective>,
    pub overrides: Vec<TrackOverride>,
}

impl MuxInput {
    /// Input that contributes every track unchanged
    pub fn passthrough(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            video: TrackFilter::All,
            audio: TrackFilter::All,
            subtitles: TrackFilter::All,
            default_tracks: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

/// Ordered mux intent. Pure data: building one never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemuxPlan {
    pub output: PathBuf,
    pub inputs: Vec<MuxInput>,
}

/// Audio codecs the pipeline knows how to extract, convert to, or rename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KnownAudioCodec {
    TrueHd,
    Dts,
    Ac3,
}

impl KnownAudioCodec {
    pub const ALL: [KnownAudioCodec; 3] = [
        KnownAudioCodec::TrueHd,
        KnownAudioCodec::Dts,
        KnownAudioCodec::Ac3,
    ];

    /// Matroska codec id
    pub fn codec_id(&self) -> &'static str {
        match self {
            KnownAudioCodec::TrueHd => "A_TRUEHD",
            KnownAudioCodec::Dts => "A_DTS",
            KnownAudioCodec::Ac3 => "A_AC3",
        }
    }

    /// Extension of the raw elementary stream written by mkvextract
    pub fn elementary_extension(&self) -> &'static str {
        match self {
            KnownAudioCodec::TrueHd => "thd",
            KnownAudioCodec::Dts => "dts",
            KnownAudioCodec::Ac3 => "ac3",
        }
    }

    /// ffmpeg encoder name
    pub fn encoder(&self) -> &'static str {
        match self {
            KnownAudioCodec::TrueHd => "truehd",
            KnownAudioCodec::Dts => "dca",
            KnownAudioCodec::Ac3 => "ac3",
        }
    }

    /// Spellings of the codec as they appear in track names
    pub fn name_tokens(&self) -> (&'static str, &'static str) {
        match self {
            KnownAudioCodec::TrueHd => ("TrueHD", "truehd"),
            KnownAudioCodec::Dts => ("DTS", "dts"),
            KnownAudioCodec::Ac3 => ("AC3", "ac3"),
        }
    }

    pub fn from_codec_id(codec_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|codec| codec.codec_id() == codec_id)
    }
}

impl fmt::Display for KnownAudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codec_id())
    }
}

impl TryFrom<String> for KnownAudioCodec {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_codec_id(value.trim()).ok_or(DomainError::UnsupportedCodec(value))
    }
}

impl From<KnownAudioCodec> for String {
    fn from(codec: KnownAudioCodec) -> Self {
        codec.codec_id().to_string()
    }
}

/// The audio track chosen as conversion source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTrack {
    pub track: Track,
    pub codec: KnownAudioCodec,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ProbeTracks,
    CheckAlreadyConverted,
    LocateSourceTrack,
    ExtractMetadata,
    CalculateDelay,
    ExtractAudio,
    ConvertAudio,
    Remux,
    ReplaceOriginal,
    Cleanup,
}

impl Stage {
    /// Number of stages that carry a progress label
    pub const LABELLED_STAGES: usize = 7;

    /// Position among the labelled stages, 1-based
    pub fn step(&self) -> Option<usize> {
        match self {
            Stage::ExtractMetadata => Some(1),
            Stage::CalculateDelay => Some(2),
            Stage::ExtractAudio => Some(3),
            Stage::ConvertAudio => Some(4),
            Stage::Remux => Some(5),
            Stage::ReplaceOriginal => Some(6),
            Stage::Cleanup => Some(7),
            _ => None,
        }
    }

    /// Label such as `[3/7]`, empty for unlabelled stages
    pub fn progress_label(&self) -> String {
        self.step()
            .map(|step| format!("[{}/{}]", step, Self::LABELLED_STAGES))
            .unwrap_or_default()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::ProbeTracks => "Probing tracks",
            Stage::CheckAlreadyConverted => "Checking for converted audio",
            Stage::LocateSourceTrack => "Locating source audio track",
            Stage::ExtractMetadata => "Extracting audio track information",
            Stage::CalculateDelay => "Calculating audio/video delay",
            Stage::ExtractAudio => "Extracting main audio track",
            Stage::ConvertAudio => "Converting audio",
            Stage::Remux => "Remuxing",
            Stage::ReplaceOriginal => "Replacing original with new file",
            Stage::Cleanup => "Deleting temporary files",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Working state of one file going through the transcode pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub source: PathBuf,
    pub temp_dir: PathBuf,
    pub source_track: SourceTrack,
    /// Raw elementary stream extracted from the source track
    pub elementary_stream: PathBuf,
    /// Converted audio in the target codec
    pub converted_audio: PathBuf,
    pub timecodes: PathBuf,
    pub new_container: PathBuf,
}

impl PipelineRun {
    /// Derive temp paths from the source base name so leftovers of an
    /// earlier failed run for another file never collide with this one.
    ///
    /// The new container sits next to the source so the final rename never
    /// crosses a filesystem boundary; only the stream intermediates go to
    /// `temp_dir`.
    pub fn new(
        source: &Path,
        temp_dir: &Path,
        source_track: SourceTrack,
        target: KnownAudioCodec,
    ) -> Self {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| OsString::from("media"));
        let named = |suffix: &str| {
            let mut name = stem.clone();
            name.push(suffix);
            name
        };
        let derive = |suffix: &str| temp_dir.join(named(suffix));
        let beside_source = |suffix: &str| match source.parent() {
            Some(parent) => parent.join(named(suffix)),
            None => PathBuf::from(named(suffix)),
        };

        let elementary_stream =
            derive(&format!(".{}", source_track.codec.elementary_extension()));
        let mut converted_audio = derive(&format!(".{}", target.elementary_extension()));
        if converted_audio == elementary_stream {
            converted_audio = derive(&format!(".converted.{}", target.elementary_extension()));
        }

        Self {
            source: source.to_path_buf(),
            temp_dir: temp_dir.to_path_buf(),
            elementary_stream,
            converted_audio,
            timecodes: derive(".tc"),
            new_container: beside_source(".new.mkv"),
            source_track,
        }
    }

    /// Every temp artifact this run may create
    pub fn intermediates(&self) -> [&Path; 4] {
        [
            &self.elementary_stream,
            &self.converted_audio,
            &self.timecodes,
            &self.new_container,
        ]
    }
}

/// Why a file was passed over without changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    NotValidContainer,
    AlreadySingleLanguage,
    LanguageNotPresent(LanguageCode),
    AlreadyConverted,
    NoConvertibleSource,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotValidContainer => write!(f, "not a valid container"),
            SkipReason::AlreadySingleLanguage => write!(f, "nothing to do, single language"),
            SkipReason::LanguageNotPresent(language) => {
                write!(f, "no audio track with language {}", language)
            }
            SkipReason::AlreadyConverted => write!(f, "already converted"),
            SkipReason::NoConvertibleSource => write!(f, "no convertible source track"),
        }
    }
}

/// Terminal status of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Skipped { reason: SkipReason },
    /// `simulated` is set when dry-run suppressed every write
    Succeeded { simulated: bool },
    Failed { stage: Option<Stage>, reason: String },
}

impl FileOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        FileOutcome::Skipped { reason }
    }

    pub fn failed(error: &DomainError) -> Self {
        FileOutcome::Failed {
            stage: error.stage(),
            reason: error.to_string(),
        }
    }
}
