// Domain rules - Business logic and policies

use crate::domain::model::*;

/// Business rules for picking the tracks that survive a language cleanup
pub struct SelectionPolicy;

impl SelectionPolicy {
    /// Decide what to keep for the target language.
    ///
    /// Pure function of its inputs; `codec_priority` is best first and only
    /// ranks same-language audio tracks.
    pub fn select(
        tracks: &TrackSet,
        language: &LanguageCode,
        codec_priority: &[String],
    ) -> Selection {
        if Self::is_single_language(tracks) {
            return Selection::NoActionNeeded;
        }

        let audio: Vec<Track> = tracks
            .audio()
            .filter(|track| track.language.as_ref() == Some(language))
            .cloned()
            .collect();
        let subtitles: Vec<Track> = tracks
            .subtitles()
            .filter(|track| track.language.as_ref() == Some(language))
            .cloned()
            .collect();

        // Subtitles alone never make a file processable
        if audio.is_empty() {
            return Selection::LanguageNotPresent;
        }

        let audio = if audio.len() > 1 {
            Self::rank_by_codec(audio, codec_priority)
        } else {
            audio
        };

        Selection::Apply(Self::assign_default_flags(audio, subtitles))
    }

    /// One audio track and no other language anywhere in audio or subtitles.
    ///
    /// Only the uniqueness of the language is checked, not whether it is the
    /// target language: a uniformly foreign file is passed through as well.
    pub fn is_single_language(tracks: &TrackSet) -> bool {
        let mut audio = tracks.audio();
        let (Some(only), None) = (audio.next(), audio.next()) else {
            return false;
        };
        tracks
            .subtitles()
            .all(|subtitle| subtitle.language == only.language)
    }

    /// Collapse to the first track of the best codec present; keep all tracks
    /// when no priority codec matches.
    fn rank_by_codec(mut audio: Vec<Track>, codec_priority: &[String]) -> Vec<Track> {
        for codec in codec_priority {
            if let Some(position) = audio.iter().position(|track| &track.codec == codec) {
                return vec![audio.swap_remove(position)];
            }
        }
        audio
    }

    fn assign_default_flags(audio: Vec<Track>, subtitles: Vec<Track>) -> SelectionResult {
        let kept_audio = audio
            .into_iter()
            .enumerate()
            .map(|(index, track)| track.with_default(index == 0))
            .collect();
        let kept_subtitles = subtitles
            .into_iter()
            .map(|track| track.with_default(false))
            .collect();
        SelectionResult {
            kept_audio,
            kept_subtitles,
        }
    }
}

/// Business rules for the audio conversion pipeline
pub struct ConversionRules;

impl ConversionRules {
    /// Any audio track already in the target codec
    pub fn already_converted(tracks: &TrackSet, target: KnownAudioCodec) -> bool {
        tracks
            .audio()
            .any(|track| track.codec == target.codec_id())
    }

    /// First audio track, in probe order, whose codec matches a convertible
    /// entry of the priority list. Entries outside the known vocabulary and
    /// the target codec itself are not convertible.
    pub fn locate_source(
        tracks: &TrackSet,
        codec_priority: &[String],
        target: KnownAudioCodec,
    ) -> Option<SourceTrack> {
        let convertible: Vec<KnownAudioCodec> = codec_priority
            .iter()
            .filter_map(|codec| KnownAudioCodec::from_codec_id(codec))
            .filter(|codec| *codec != target)
            .collect();

        tracks.audio().find_map(|track| {
            convertible
                .iter()
                .find(|codec| track.codec.contains(codec.codec_id()))
                .map(|codec| SourceTrack {
                    track: track.clone(),
                    codec: *codec,
                })
        })
    }

    /// Rewrite a track name so it names the new codec, e.g.
    /// `"DTS-HD MA 5.1"` becomes `"AC3-HD MA 5.1"`.
    pub fn rewrite_track_name(name: &str, target: KnownAudioCodec) -> String {
        let (upper, lower) = target.name_tokens();
        KnownAudioCodec::ALL
            .into_iter()
            .filter(|codec| *codec != target)
            .fold(name.trim_end().to_string(), |renamed, codec| {
                let (from_upper, from_lower) = codec.name_tokens();
                renamed
                    .replace(from_upper, upper)
                    .replace(from_lower, lower)
            })
    }
}
