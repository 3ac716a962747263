// Inspect interactor - Orchestrates the read-only inspection use case

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::adapters::MkvToolnix;
use crate::app::toolbox::Toolbox;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{ConversionRules, SelectionPolicy};
use crate::planner::RemuxPlanner;
use crate::probe::{parse_tracks, ProbeFormat};
use crate::utils::path::temp_output_for;

/// What the clean command would do with one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectResponse {
    pub file: PathBuf,
    pub language: LanguageCode,
    pub tracks: Vec<Track>,
    pub selection: Selection,
    /// Set when the selection leads to a remux
    pub plan: Option<RemuxPlan>,
    pub mux_command: Option<String>,
    /// Track the convert command would transcode
    pub conversion_source: Option<SourceTrack>,
    pub already_converted: bool,
}

/// Interactor for inspecting a single container; never writes
pub struct InspectInteractor {
    config: Arc<NormalizeConfig>,
    toolbox: Arc<Toolbox>,
    tools: MkvToolnix,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(config: Arc<NormalizeConfig>, toolbox: Arc<Toolbox>) -> Self {
        let tools = MkvToolnix::new(&config.tools);
        Self {
            config,
            toolbox,
            tools,
        }
    }

    /// Probe the file and report the selection and rendered mux command
    pub async fn inspect_file(&self, file: &Path) -> Result<InspectResponse, DomainError> {
        info!("Starting inspection for: {}", file.display());

        let invocation = self.tools.identify_verbose(file);
        let probe = self.toolbox.inspect(&invocation).await?;
        if !probe.succeeded(0) {
            return Err(DomainError::ProbeFailure {
                tool: invocation.tool.to_string(),
                path: file.to_path_buf(),
                code: probe.code,
            });
        }

        let tracks = parse_tracks(ProbeFormat::Verbose, &probe.stdout);
        let selection = SelectionPolicy::select(
            &tracks,
            &self.config.language,
            &self.config.audio_codec_priority,
        );
        let plan = match &selection {
            Selection::Apply(result) => Some(RemuxPlanner::language_cleanup(
                file,
                &temp_output_for(file),
                result,
            )),
            _ => None,
        };
        let mux_command = plan
            .as_ref()
            .map(|plan| self.tools.merge(plan).command_line());

        let target = self.config.transcode.target_codec;
        let already_converted = ConversionRules::already_converted(&tracks, target);
        let conversion_source = if already_converted {
            None
        } else {
            ConversionRules::locate_source(&tracks, &self.config.audio_codec_priority, target)
        };

        Ok(InspectResponse {
            file: file.to_path_buf(),
            language: self.config.language.clone(),
            tracks: tracks.tracks().to_vec(),
            selection,
            plan,
            mux_command,
            conversion_source,
            already_converted,
        })
    }
}

impl InspectResponse {
    /// Human-readable rendering
    pub fn render_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("File: {}\n", self.file.display()));
        output.push_str(&format!("Tracks ({}):\n", self.tracks.len()));
        for track in &self.tracks {
            output.push_str(&format!(
                "  #{} {} {} lang={}{}{}{}\n",
                track.id,
                track.kind,
                track.codec,
                track
                    .language
                    .as_ref()
                    .map(LanguageCode::as_str)
                    .unwrap_or("und"),
                if track.is_default { " default" } else { "" },
                if track.is_forced { " forced" } else { "" },
                track
                    .name
                    .as_ref()
                    .map(|name| format!(" name=\"{}\"", name))
                    .unwrap_or_default(),
            ));
        }

        output.push_str(&format!("\nSelection for {}: ", self.language));
        match &self.selection {
            Selection::NoActionNeeded => output.push_str("no action needed (single language)\n"),
            Selection::LanguageNotPresent => output.push_str("language not present in audio\n"),
            Selection::Apply(result) => {
                output.push_str(&format!(
                    "keep audio {:?}, subtitles {:?}\n",
                    result.kept_audio.iter().map(|t| t.id).collect::<Vec<_>>(),
                    result.kept_subtitles.iter().map(|t| t.id).collect::<Vec<_>>()
                ));
            }
        }
        if let Some(command) = &self.mux_command {
            output.push_str(&format!("  {}\n", command));
        }

        output.push_str("\nConversion: ");
        match (&self.conversion_source, self.already_converted) {
            (_, true) => output.push_str("already converted\n"),
            (Some(source), false) => output.push_str(&format!(
                "track {} ({})\n",
                source.track.id, source.codec
            )),
            (None, false) => output.push_str("no convertible source track\n"),
        }

        output
    }
}
