//! Depth-bounded subtree extraction over `mkvinfo` output
//!
//! `mkvinfo` prints a flat, indented tree:
//!
//! ```text
//! |+ Tracks
//! | + Track
//! |  + Track number: 2 (track ID for mkvmerge & mkvextract: 1)
//! |  + Codec ID: A_DTS
//! |  + Language: ger
//! | + Track
//! ```
//!
//! The depth of a line is the number of spaces between the leading `|` and
//! the `+`.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::model::LanguageCode;

const MKVMERGE_ID_MARKER: &str = "track ID for mkvmerge & mkvextract:";
const TRACK_NUMBER_MARKER: &str = "+ Track number:";

fn depth_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\|( *)\+").expect("depth grammar is a valid regex"))
}

fn field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\|?\s*\+\s*(?P<key>[^:]+?):\s*(?P<value>.*)$")
            .expect("field grammar is a valid regex")
    })
}

/// Nesting depth of a tree line, `None` for lines without the `| +` prefix
pub fn line_depth(line: &str) -> Option<usize> {
    depth_regex()
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|spaces| spaces.as_str().len())
}

/// Lines of the subtree describing `track_id`, starting with the anchor line.
///
/// Collection stops at the first line shallower than the anchor. Lines
/// without a tree prefix are treated as continuations and kept.
pub fn extract_track_subtree(output: &str, track_id: u32) -> Vec<&str> {
    let mut start_depth: Option<usize> = None;
    let mut collected = Vec::new();

    for line in output.lines() {
        let depth = line_depth(line);
        match start_depth {
            None => {
                if is_anchor(line, track_id) {
                    start_depth = Some(depth.unwrap_or(0));
                    collected.push(line);
                }
            }
            Some(start) => {
                if depth.is_some_and(|depth| depth < start) {
                    break;
                }
                collected.push(line);
            }
        }
    }
    collected
}

/// Prefer the mkvmerge id marker; fall back to the legacy track number line
/// only when the marker is absent from the line.
fn is_anchor(line: &str, track_id: u32) -> bool {
    if let Some(position) = line.find(MKVMERGE_ID_MARKER) {
        return leading_number(&line[position + MKVMERGE_ID_MARKER.len()..]) == Some(track_id);
    }
    line.find(TRACK_NUMBER_MARKER)
        .map(|position| leading_number(&line[position + TRACK_NUMBER_MARKER.len()..]))
        == Some(Some(track_id))
}

fn leading_number(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Language and name declared in a track subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDetail {
    pub language: Option<LanguageCode>,
    pub name: Option<String>,
}

/// Scan a subtree for its `Language` and `Name` fields (last one wins)
pub fn scan_detail(lines: &[&str]) -> TrackDetail {
    let mut detail = TrackDetail::default();
    for line in lines {
        let Some(captures) = field_regex().captures(line) else {
            continue;
        };
        let value = captures["value"].trim_end();
        match captures["key"].trim() {
            "Language" => {
                if let Some(language) = value.split_whitespace().last().and_then(LanguageCode::normalize) {
                    detail.language = Some(language);
                }
            }
            "Name" if !value.is_empty() => detail.name = Some(value.to_string()),
            _ => {}
        }
    }
    detail
}
