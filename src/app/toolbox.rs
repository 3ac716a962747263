// Toolbox - The one place where dry-run decides what actually happens

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Result of a write-effect invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Executed(ToolOutput),
    /// Suppressed by dry-run
    Simulated,
}

impl Applied {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Applied::Simulated)
    }
}

/// Gatekeeper over the execution and filesystem ports.
///
/// Inspections always run. Every write (extract, convert, mux, replace,
/// cleanup, temp directory creation) goes through [`Toolbox::allows`] and is
/// only logged when dry-run is on.
pub struct Toolbox {
    exec: Arc<dyn ExecutePort>,
    fs: Arc<dyn FsPort>,
    dry_run: bool,
}

impl Toolbox {
    pub fn new(exec: Arc<dyn ExecutePort>, fs: Arc<dyn FsPort>, dry_run: bool) -> Self {
        Self { exec, fs, dry_run }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Read-only filesystem access
    pub fn fs(&self) -> &dyn FsPort {
        self.fs.as_ref()
    }

    fn allows(&self, effect: ToolEffect) -> bool {
        !(self.dry_run && effect == ToolEffect::Write)
    }

    /// Run a read-only invocation and hand back its raw output; the caller
    /// decides what a non-zero exit means. Write invocations are rejected.
    pub async fn inspect(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError> {
        if invocation.effect != ToolEffect::Inspect {
            return Err(DomainError::NotReadOnly(invocation.tool.to_string()));
        }
        debug!("Running: {}", invocation.command_line());
        self.exec.run(invocation).await
    }

    /// Run a write invocation; any exit above its success threshold is a
    /// [`DomainError::ToolFailure`].
    pub async fn apply(&self, invocation: &ToolInvocation) -> Result<Applied, DomainError> {
        if !self.allows(invocation.effect) {
            info!("Dry run, would run: {}", invocation.command_line());
            return Ok(Applied::Simulated);
        }

        debug!("Running: {}", invocation.command_line());
        let output = self.exec.run(invocation).await?;
        if !output.succeeded(invocation.max_success_code) {
            return Err(DomainError::ToolFailure {
                tool: invocation.tool.to_string(),
                code: output.code,
                stderr: output.diagnostic_tail(),
            });
        }
        if output.has_warnings() {
            warn!(
                "{} finished with warnings: {}",
                invocation.tool,
                output.diagnostic_tail()
            );
        }
        Ok(Applied::Executed(output))
    }

    /// Create a directory tree for intermediates
    pub async fn ensure_dir(&self, path: &Path) -> Result<(), DomainError> {
        if !self.allows(ToolEffect::Write) {
            info!("Dry run, would create {}", path.display());
            return Ok(());
        }
        self.fs.create_directory(path).await
    }

    /// Move `replacement` over `original`.
    ///
    /// The original is only touched after the replacement is confirmed
    /// present. Returns `false` when dry-run suppressed the move.
    pub async fn replace(&self, replacement: &Path, original: &Path) -> Result<bool, DomainError> {
        if !self.allows(ToolEffect::Write) {
            info!(
                "Dry run, would replace {} with {}",
                original.display(),
                replacement.display()
            );
            return Ok(false);
        }
        if !self.fs.file_exists(replacement).await {
            return Err(DomainError::ReplacementMissing(replacement.to_path_buf()));
        }
        self.fs.rename(replacement, original).await?;
        Ok(true)
    }

    /// Remove every path, missing ones included. All removals are attempted;
    /// the first failure is returned. Returns the number of files removed.
    pub async fn cleanup(&self, paths: &[&Path]) -> Result<usize, DomainError> {
        if !self.allows(ToolEffect::Write) {
            for path in paths {
                info!("Dry run, would delete {}", path.display());
            }
            return Ok(0);
        }

        let mut removed = 0;
        let mut first_error = None;
        for path in paths {
            match self.fs.remove_file_if_exists(path).await {
                Ok(true) => {
                    debug!("Deleted {}", path.display());
                    removed += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Could not delete {}: {}", path.display(), e);
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}
