//! Track probe parsing
//!
//! Turns the text printed by `mkvmerge` into typed [`Track`] records. Two
//! line grammars are supported:
//!
//! - [`ProbeFormat::Verbose`]: `--identify-verbose` lines with a bracketed
//!   attribute block whose keys come in any order
//!   (`Track ID 2: audio (A_DTS) [number:3 ... language:eng default_track:1 forced_track:0]`)
//! - [`ProbeFormat::Identify`]: plain `-i` listing lines
//!   (`Track ID 2: audio (A_DTS)`), where the id is recovered by splitting
//!   the leading tokens on whitespace
//!
//! Lines matching neither grammar are skipped silently.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::model::{LanguageCode, Track, TrackKind, TrackSet};

pub mod timecodes;
pub mod tree;

/// Named probe output grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFormat {
    /// `mkvmerge --identify-verbose`
    Verbose,
    /// `mkvmerge -i`
    Identify,
}

fn verbose_track_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^Track ID (?P<id>\d+): (?P<kind>\S+) \((?P<codec>[^)]*)\)(?:\s*\[(?P<attrs>[^\]]*)\])?",
        )
        .expect("verbose track grammar is a valid regex")
    })
}

/// Parse a whole probe listing into a track set
pub fn parse_tracks(format: ProbeFormat, output: &str) -> TrackSet {
    output
        .lines()
        .filter_map(|line| {
            debug!(line, "probe line");
            parse_track_line(format, line)
        })
        .collect()
}

/// Parse one line with the given grammar
pub fn parse_track_line(format: ProbeFormat, line: &str) -> Option<Track> {
    match format {
        ProbeFormat::Verbose => parse_verbose_line(line),
        ProbeFormat::Identify => parse_identify_line(line),
    }
}

/// Verbose grammar: id, kind keyword, parenthesized codec, attribute block
pub fn parse_verbose_line(line: &str) -> Option<Track> {
    let captures = verbose_track_regex().captures(line.trim_end())?;
    let id = captures.name("id")?.as_str().parse().ok()?;
    let kind = TrackKind::from_keyword(captures.name("kind")?.as_str());
    let codec = captures.name("codec")?.as_str();

    let mut track = Track::new(id, kind, codec);
    if let Some(attrs) = captures.name("attrs") {
        apply_attributes(&mut track, attrs.as_str());
    }
    Some(track)
}

/// Attribute keys are matched by name, in any order, with any number of
/// unrelated tokens in between.
fn apply_attributes(track: &mut Track, attrs: &str) {
    for token in attrs.split_whitespace() {
        let Some((key, value)) = token.split_once(':') else {
            continue;
        };
        match key {
            "language" => track.language = LanguageCode::normalize(value),
            "default_track" => track.is_default = value == "1",
            "forced_track" => track.is_forced = value == "1",
            "track_name" => track.name = Some(unescape_value(value)),
            _ => {}
        }
    }
}

/// Undo mkvmerge's escaping of attribute values
fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('2') => out.push('"'),
            Some('c') => out.push(':'),
            Some('h') => out.push('#'),
            Some('b') => out.push('['),
            Some('B') => out.push(']'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Identify grammar: `Track ID <id>: <kind> (<codec>) ...`
pub fn parse_identify_line(line: &str) -> Option<Track> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "Track" || tokens.next()? != "ID" {
        return None;
    }
    let id = tokens.next()?.strip_suffix(':')?.parse().ok()?;
    let kind = TrackKind::from_keyword(tokens.next()?);
    let codec = codec_token(line)?;
    Some(Track::new(id, kind, codec))
}

/// Token strictly between the first `" ("` and the next `")"`
pub fn codec_token(line: &str) -> Option<&str> {
    let start = line.find(" (")? + 2;
    let len = line[start..].find(')')?;
    Some(&line[start..start + len])
}
