//! Remux planning
//!
//! Turns a selection or a finished conversion into a [`RemuxPlan`]. Plans are
//! pure data; rendering them into mkvmerge arguments happens in the
//! `mkvtoolnix` adapter.

use std::path::Path;

use serde::Serialize;

use crate::domain::model::*;

/// Metadata carried over to the converted audio track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedTrackMetadata {
    pub language: LanguageCode,
    /// Already rewritten to name the target codec
    pub name: Option<String>,
    /// `None` means no sync directive at all
    pub delay: Option<SyncOffset>,
}

/// Remux plan builder
pub struct RemuxPlanner;

impl RemuxPlanner {
    /// Plan for the language cleanup: keep video, the selected audio and the
    /// selected subtitles, with one default directive per kept track.
    ///
    /// An empty subtitle selection becomes an explicit "no subtitles" filter.
    pub fn language_cleanup(source: &Path, output: &Path, selection: &SelectionResult) -> RemuxPlan {
        let audio_ids: Vec<u32> = selection.kept_audio.iter().map(|track| track.id).collect();
        let subtitle_ids: Vec<u32> = selection
            .kept_subtitles
            .iter()
            .map(|track| track.id)
            .collect();

        let subtitles = if subtitle_ids.is_empty() {
            TrackFilter::None
        } else {
            TrackFilter::Only(subtitle_ids)
        };

        let default_tracks = selection
            .kept_audio
            .iter()
            .chain(selection.kept_subtitles.iter())
            .map(|track| DefaultTrackDirective {
                track_id: track.id,
                is_default: track.is_default,
            })
            .collect();

        RemuxPlan {
            output: output.to_path_buf(),
            inputs: vec![MuxInput {
                audio: TrackFilter::Only(audio_ids),
                subtitles,
                default_tracks,
                ..MuxInput::passthrough(source)
            }],
        }
    }

    /// Plan for the transcode pipeline: the original container without any
    /// audio and with uncompressed video, followed by the converted audio.
    pub fn transcode_remux(
        run: &PipelineRun,
        video_track: Option<u32>,
        metadata: &ConvertedTrackMetadata,
    ) -> RemuxPlan {
        let original = MuxInput {
            audio: TrackFilter::None,
            overrides: video_track
                .map(|id| TrackOverride {
                    compression: Some(Compression::None),
                    ..TrackOverride::new(id)
                })
                .into_iter()
                .collect(),
            ..MuxInput::passthrough(&run.source)
        };

        // Elementary streams carry a single track, always id 0
        let converted = MuxInput {
            overrides: vec![TrackOverride {
                track_id: 0,
                language: Some(metadata.language.clone()),
                name: metadata.name.clone(),
                sync: metadata.delay.clone(),
                compression: Some(Compression::None),
            }],
            ..MuxInput::passthrough(&run.converted_audio)
        };

        RemuxPlan {
            output: run.new_container.clone(),
            inputs: vec![original, converted],
        }
    }
}
