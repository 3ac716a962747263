//! MKVToolNix invocation builders
//!
//! Renders probe, extract and mux requests into discrete argument lists for
//! `mkvmerge`, `mkvinfo` and `mkvextract`. Nothing here runs a process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::model::*;
use crate::ports::*;

/// Builder for MKVToolNix command lines
#[derive(Debug, Clone)]
pub struct MkvToolnix {
    mkvmerge: PathBuf,
    mkvinfo: PathBuf,
    mkvextract: PathBuf,
}

impl MkvToolnix {
    pub fn new(tools: &ToolPaths) -> Self {
        Self {
            mkvmerge: tools.mkvmerge.clone(),
            mkvinfo: tools.mkvinfo.clone(),
            mkvextract: tools.mkvextract.clone(),
        }
    }

    /// `mkvmerge --identify-verbose <file>`
    pub fn identify_verbose(&self, source: &Path) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Mkvmerge, &self.mkvmerge, ToolEffect::Inspect)
            .arg("--identify-verbose")
            .arg(source)
    }

    /// `mkvmerge -i <file>`
    pub fn identify(&self, source: &Path) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Mkvmerge, &self.mkvmerge, ToolEffect::Inspect)
            .arg("-i")
            .arg(source)
    }

    /// `mkvinfo <file>`
    pub fn info(&self, source: &Path) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Mkvinfo, &self.mkvinfo, ToolEffect::Inspect).arg(source)
    }

    /// `mkvextract <file> tracks <id>:<dest> ...`
    pub fn extract_tracks(&self, source: &Path, tracks: &[(u32, &Path)]) -> ToolInvocation {
        tracks.iter().fold(
            ToolInvocation::new(ToolKind::Mkvextract, &self.mkvextract, ToolEffect::Write)
                .arg(source)
                .arg("tracks"),
            |invocation, (id, destination)| invocation.arg(track_spec(*id, destination)),
        )
    }

    /// `mkvextract <file> timestamps_v2 <id>:<dest>`
    pub fn export_timestamps(&self, source: &Path, track_id: u32, destination: &Path) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Mkvextract, &self.mkvextract, ToolEffect::Write)
            .arg(source)
            .arg("timestamps_v2")
            .arg(track_spec(track_id, destination))
    }

    /// Render a remux plan; options precede the input file they apply to
    pub fn merge(&self, plan: &RemuxPlan) -> ToolInvocation {
        let invocation = ToolInvocation::new(ToolKind::Mkvmerge, &self.mkvmerge, ToolEffect::Write)
            .tolerate_warnings(1)
            .flag("-o", &plan.output);
        plan.inputs.iter().fold(invocation, render_input)
    }
}

fn track_spec(track_id: u32, destination: &Path) -> OsString {
    let mut spec = OsString::from(format!("{}:", track_id));
    spec.push(destination);
    spec
}

fn render_input(invocation: ToolInvocation, input: &MuxInput) -> ToolInvocation {
    let invocation = render_filter(invocation, &input.video, "--video-tracks", "--no-video");
    let invocation = render_filter(invocation, &input.audio, "--audio-tracks", "--no-audio");
    let invocation = render_filter(
        invocation,
        &input.subtitles,
        "--subtitle-tracks",
        "--no-subtitles",
    );

    let invocation = input.default_tracks.iter().fold(invocation, |invocation, directive| {
        invocation.flag(
            "--default-track",
            format!("{}:{}", directive.track_id, u8::from(directive.is_default)),
        )
    });

    input
        .overrides
        .iter()
        .fold(invocation, render_override)
        .arg(&input.source)
}

fn render_filter(
    invocation: ToolInvocation,
    filter: &TrackFilter,
    keep_flag: &str,
    drop_flag: &str,
) -> ToolInvocation {
    match filter {
        TrackFilter::All => invocation,
        TrackFilter::None => invocation.arg(drop_flag),
        TrackFilter::Only(ids) => invocation.flag(keep_flag, join_ids(ids)),
    }
}

fn render_override(invocation: ToolInvocation, track: &TrackOverride) -> ToolInvocation {
    let id = track.track_id;
    let mut invocation = invocation;
    if let Some(language) = &track.language {
        invocation = invocation.flag("--language", format!("{}:{}", id, language));
    }
    if let Some(name) = &track.name {
        invocation = invocation.flag("--track-name", format!("{}:{}", id, name));
    }
    if let Some(sync) = &track.sync {
        invocation = invocation.flag("--sync", format!("{}:{}", id, sync));
    }
    if let Some(compression) = track.compression {
        invocation = invocation.flag("--compression", format!("{}:{}", id, compression.as_str()));
    }
    invocation
}

/// Ordered, comma-joined id list
pub fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
