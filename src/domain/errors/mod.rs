// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::Stage;

/// Domain-specific error types
///
/// Skips (already converted, language not present, ...) are not errors; they
/// are reported through `FileOutcome::Skipped`. Everything here aborts the
/// current file and is turned into a failed outcome at the batch boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The inspection tool rejected the file
    #[error("{tool} could not identify {}: exit status {}", .path.display(), fmt_code(.code))]
    ProbeFailure {
        tool: String,
        path: PathBuf,
        code: Option<i32>,
    },

    /// An external extract/convert/mux tool returned a failing exit status
    #[error("{tool} failed with exit status {}: {stderr}", fmt_code(.code))]
    ToolFailure {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The external tool could not be launched at all
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem operation failed
    #[error("filesystem operation on {} failed: {source}", .path.display())]
    Fs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A writing invocation was routed through the read-only path
    #[error("{0} writes files and cannot run as an inspection")]
    NotReadOnly(String),

    /// The remuxed container is not where it should be; the original is kept
    #[error("replacement file {} is missing; original left untouched", .0.display())]
    ReplacementMissing(PathBuf),

    /// Language code is not three ASCII letters
    #[error("invalid language code: {0:?}")]
    InvalidLanguage(String),

    /// Codec id outside the known vocabulary
    #[error("unsupported audio codec: {0}")]
    UnsupportedCodec(String),

    /// Configuration rejected during resolution
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error attributed to a pipeline stage
    #[error("{stage} failed: {source}")]
    AtStage {
        stage: Stage,
        #[source]
        source: Box<DomainError>,
    },
}

impl DomainError {
    /// Attribute this error to a pipeline stage (the innermost stage wins)
    pub fn at(self, stage: Stage) -> Self {
        match self {
            DomainError::AtStage { .. } => self,
            other => DomainError::AtStage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage this error was attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DomainError::AtStage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DomainError::Fs {
            path: path.into(),
            source,
        }
    }
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    }
}
