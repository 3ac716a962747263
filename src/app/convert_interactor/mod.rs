// Convert interactor - Orchestrates the DTS/TrueHD to AC3 transcode pipeline

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::adapters::{FFmpegTool, MkvToolnix};
use crate::app::batch::{FileProcessor, WalkDepth};
use crate::app::toolbox::Toolbox;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::ConversionRules;
use crate::planner::{ConvertedTrackMetadata, RemuxPlanner};
use crate::probe::timecodes::delay_from_timecodes;
use crate::probe::tree::{extract_track_subtree, scan_detail};
use crate::probe::{parse_tracks, ProbeFormat};

/// Interactor for converting the main audio track of one container
pub struct ConvertInteractor {
    config: Arc<NormalizeConfig>,
    toolbox: Arc<Toolbox>,
    mkvtoolnix: MkvToolnix,
    ffmpeg: FFmpegTool,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(config: Arc<NormalizeConfig>, toolbox: Arc<Toolbox>) -> Self {
        let mkvtoolnix = MkvToolnix::new(&config.tools);
        let ffmpeg = FFmpegTool::new(&config.tools.ffmpeg);
        Self {
            config,
            toolbox,
            mkvtoolnix,
            ffmpeg,
        }
    }

    fn target(&self) -> KnownAudioCodec {
        self.config.transcode.target_codec
    }

    /// Run the pipeline for one file.
    ///
    /// Skips come back as `Ok`. Once a source track is chosen, intermediates
    /// are removed at the end whether or not the run succeeded.
    pub async fn convert_file(&self, file: &Path) -> Result<FileOutcome, DomainError> {
        let probe = self
            .toolbox
            .inspect(&self.mkvtoolnix.identify(file))
            .await
            .map_err(|e| e.at(Stage::ProbeTracks))?;
        if !probe.succeeded(0) {
            return Ok(FileOutcome::skipped(SkipReason::NotValidContainer));
        }
        let tracks = parse_tracks(ProbeFormat::Identify, &probe.stdout);

        if ConversionRules::already_converted(&tracks, self.target()) {
            return Ok(FileOutcome::skipped(SkipReason::AlreadyConverted));
        }

        let Some(source_track) = ConversionRules::locate_source(
            &tracks,
            &self.config.audio_codec_priority,
            self.target(),
        ) else {
            return Ok(FileOutcome::skipped(SkipReason::NoConvertibleSource));
        };
        info!(
            "Main audio track {} ({})",
            source_track.track.id, source_track.codec
        );

        let run = PipelineRun::new(
            file,
            &self.config.temp_directory(),
            source_track,
            self.target(),
        );
        let video_track = tracks.primary_video().map(|track| track.id);

        let result = self.run_stages(&run, video_track).await;
        let cleanup = self.cleanup(&run).await;

        match (result, cleanup) {
            (Ok(()), Ok(())) => Ok(FileOutcome::Succeeded {
                simulated: self.toolbox.dry_run(),
            }),
            (Ok(()), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup)) => {
                warn!("Cleanup after failure also failed: {}", cleanup);
                Err(e)
            }
        }
    }

    async fn run_stages(&self, run: &PipelineRun, video_track: Option<u32>) -> Result<(), DomainError> {
        let source_id = run.source_track.track.id;

        announce(Stage::ExtractMetadata);
        let mut metadata = self
            .extract_metadata(run)
            .await
            .map_err(|e| e.at(Stage::ExtractMetadata))?;

        announce(Stage::CalculateDelay);
        metadata.delay = self
            .calculate_delay(run)
            .await
            .map_err(|e| e.at(Stage::CalculateDelay))?;

        announce(Stage::ExtractAudio);
        self.toolbox
            .apply(
                &self
                    .mkvtoolnix
                    .extract_tracks(&run.source, &[(source_id, run.elementary_stream.as_path())]),
            )
            .await
            .map_err(|e| e.at(Stage::ExtractAudio))?;

        announce(Stage::ConvertAudio);
        self.toolbox
            .apply(&self.ffmpeg.convert_with(
                &self.config.transcode,
                &run.elementary_stream,
                &run.converted_audio,
            ))
            .await
            .map_err(|e| e.at(Stage::ConvertAudio))?;

        announce(Stage::Remux);
        let plan = RemuxPlanner::transcode_remux(run, video_track, &metadata);
        self.toolbox
            .apply(&self.mkvtoolnix.merge(&plan))
            .await
            .map_err(|e| e.at(Stage::Remux))?;

        announce(Stage::ReplaceOriginal);
        self.toolbox
            .replace(&run.new_container, &run.source)
            .await
            .map_err(|e| e.at(Stage::ReplaceOriginal))?;

        Ok(())
    }

    /// Language and rewritten name of the source track from the mkvinfo tree
    async fn extract_metadata(&self, run: &PipelineRun) -> Result<ConvertedTrackMetadata, DomainError> {
        let invocation = self.mkvtoolnix.info(&run.source);
        let output = self.toolbox.inspect(&invocation).await?;
        if !output.succeeded(invocation.max_success_code) {
            return Err(DomainError::ToolFailure {
                tool: invocation.tool.to_string(),
                code: output.code,
                stderr: output.diagnostic_tail(),
            });
        }

        let subtree = extract_track_subtree(&output.stdout, run.source_track.track.id);
        let detail = scan_detail(&subtree);

        let language = detail
            .language
            .unwrap_or_else(|| self.config.language.clone());
        let name = detail
            .name
            .map(|name| ConversionRules::rewrite_track_name(&name, self.target()))
            .filter(|name| !name.is_empty());
        info!(
            "Track language {}, name {}",
            language,
            name.as_deref().unwrap_or("(none)")
        );

        Ok(ConvertedTrackMetadata {
            language,
            name,
            delay: None,
        })
    }

    /// Second line of the timestamp export; a simulated export means no delay
    async fn calculate_delay(&self, run: &PipelineRun) -> Result<Option<SyncOffset>, DomainError> {
        self.toolbox.ensure_dir(&run.temp_dir).await?;

        let export = self.mkvtoolnix.export_timestamps(
            &run.source,
            run.source_track.track.id,
            &run.timecodes,
        );
        if self.toolbox.apply(&export).await?.is_simulated() {
            return Ok(None);
        }

        let timecodes = self.toolbox.fs().read_to_string(&run.timecodes).await?;
        let delay = delay_from_timecodes(&timecodes);
        match &delay {
            Some(delay) => info!("Audio delay {}", delay),
            None => info!("No audio delay"),
        }
        Ok(delay)
    }

    async fn cleanup(&self, run: &PipelineRun) -> Result<(), DomainError> {
        announce(Stage::Cleanup);
        self.toolbox
            .cleanup(&run.intermediates())
            .await
            .map(|_| ())
            .map_err(|e| e.at(Stage::Cleanup))
    }
}

fn announce(stage: Stage) {
    info!("{} {}", stage.progress_label(), stage);
}

#[async_trait]
impl FileProcessor for ConvertInteractor {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn walk_depth(&self) -> WalkDepth {
        WalkDepth::SingleLevel
    }

    async fn process(&self, file: &Path) -> Result<FileOutcome, DomainError> {
        self.convert_file(file).await
    }
}
