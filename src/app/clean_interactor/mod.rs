// Clean interactor - Orchestrates the language cleanup use case

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::adapters::mkvtoolnix::{join_ids, MkvToolnix};
use crate::app::batch::{FileProcessor, WalkDepth};
use crate::app::toolbox::Toolbox;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::SelectionPolicy;
use crate::planner::RemuxPlanner;
use crate::probe::{parse_tracks, ProbeFormat};
use crate::utils::path::temp_output_for;

/// Interactor for the language cleanup of one container
pub struct CleanInteractor {
    config: Arc<NormalizeConfig>,
    toolbox: Arc<Toolbox>,
    tools: MkvToolnix,
}

impl CleanInteractor {
    /// Create new clean interactor with injected ports
    pub fn new(config: Arc<NormalizeConfig>, toolbox: Arc<Toolbox>) -> Self {
        let tools = MkvToolnix::new(&config.tools);
        Self {
            config,
            toolbox,
            tools,
        }
    }

    /// Probe, select, remux to `<file>.temp` and move it over the original
    pub async fn clean_file(&self, file: &Path) -> Result<FileOutcome, DomainError> {
        let probe = self
            .toolbox
            .inspect(&self.tools.identify_verbose(file))
            .await
            .map_err(|e| e.at(Stage::ProbeTracks))?;
        if !probe.succeeded(0) {
            return Ok(FileOutcome::skipped(SkipReason::NotValidContainer));
        }

        let tracks = parse_tracks(ProbeFormat::Verbose, &probe.stdout);
        let selection = match SelectionPolicy::select(
            &tracks,
            &self.config.language,
            &self.config.audio_codec_priority,
        ) {
            Selection::NoActionNeeded => {
                return Ok(FileOutcome::skipped(SkipReason::AlreadySingleLanguage))
            }
            Selection::LanguageNotPresent => {
                return Ok(FileOutcome::skipped(SkipReason::LanguageNotPresent(
                    self.config.language.clone(),
                )))
            }
            Selection::Apply(selection) => selection,
        };

        info!(
            "Keeping audio [{}] and subtitles [{}]",
            ids(&selection.kept_audio),
            ids(&selection.kept_subtitles)
        );

        let output = temp_output_for(file);
        let plan = RemuxPlanner::language_cleanup(file, &output, &selection);
        if let Err(e) = self.toolbox.apply(&self.tools.merge(&plan)).await {
            self.discard(&output).await;
            return Err(e.at(Stage::Remux));
        }

        if let Err(e) = self.toolbox.replace(&output, file).await {
            self.discard(&output).await;
            return Err(e.at(Stage::ReplaceOriginal));
        }

        Ok(FileOutcome::Succeeded {
            simulated: self.toolbox.dry_run(),
        })
    }

    /// Never leave a half-written or unplaced container behind
    async fn discard(&self, output: &Path) {
        if let Err(cleanup) = self.toolbox.cleanup(&[output]).await {
            warn!("Could not remove {}: {}", output.display(), cleanup);
        }
    }
}

fn ids(tracks: &[Track]) -> String {
    join_ids(&tracks.iter().map(|track| track.id).collect::<Vec<_>>())
}

#[async_trait]
impl FileProcessor for CleanInteractor {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn walk_depth(&self) -> WalkDepth {
        WalkDepth::Recursive
    }

    async fn process(&self, file: &Path) -> Result<FileOutcome, DomainError> {
        self.clean_file(file).await
    }
}
