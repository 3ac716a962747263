// Ports - Interface definitions (contracts)

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;

/// External tools driven by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Mkvmerge,
    Mkvinfo,
    Mkvextract,
    Ffmpeg,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolKind::Mkvmerge => "mkvmerge",
            ToolKind::Mkvinfo => "mkvinfo",
            ToolKind::Mkvextract => "mkvextract",
            ToolKind::Ffmpeg => "ffmpeg",
        };
        f.write_str(name)
    }
}

/// What running an invocation does to the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEffect {
    /// Reads the source only; always runs, even in dry-run
    Inspect,
    /// Writes files; suppressed in dry-run
    Write,
}

/// One external tool call: program plus discrete argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: ToolKind,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub effect: ToolEffect,
    /// Highest exit code still counted as success (mkvmerge uses 1 for warnings)
    pub max_success_code: i32,
}

impl ToolInvocation {
    pub fn new(tool: ToolKind, program: impl Into<PathBuf>, effect: ToolEffect) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            effect,
            max_success_code: 0,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Flag followed by its value; the two always stay adjacent
    pub fn flag(self, flag: &str, value: impl Into<OsString>) -> Self {
        self.arg(flag).arg(value)
    }

    pub fn tolerate_warnings(mut self, max_success_code: i32) -> Self {
        self.max_success_code = max_success_code;
        self
    }

    /// Arguments as lossy strings, for logs and assertions
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// Shell-like rendering for operator logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args_lossy().into_iter().map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("\"{}\"", arg)
                } else {
                    arg
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn succeeded(&self, max_success_code: i32) -> bool {
        matches!(self.code, Some(code) if (0..=max_success_code).contains(&code))
    }

    pub fn has_warnings(&self) -> bool {
        matches!(self.code, Some(code) if code > 0)
    }

    /// Last lines of stderr (or stdout, where mkvtoolnix reports errors)
    pub fn diagnostic_tail(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(5);
        lines[start..].join(" | ")
    }
}

/// Port for running external tools.
///
/// Invocations are awaited one at a time; implementations block the calling
/// task until the tool exits and enforce no timeout.
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run the invocation to completion and capture its output
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a file exists
    async fn file_exists(&self, path: &Path) -> bool;

    /// Read a whole text file
    async fn read_to_string(&self, path: &Path) -> Result<String, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, path: &Path) -> Result<(), DomainError>;

    /// Move a file over another in one rename
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Delete a file; returns `false` when it did not exist
    async fn remove_file_if_exists(&self, path: &Path) -> Result<bool, DomainError>;
}
