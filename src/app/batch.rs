// Batch orchestration - Walks the working directory and isolates per-file failures

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{NormalizeError, NormalizeResult};
use crate::utils::{format_elapsed, path::is_container};

/// How deep candidate discovery descends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkDepth {
    /// Only the working directory itself
    SingleLevel,
    /// Every subdirectory
    Recursive,
}

/// A per-file use case driven by the orchestrator
#[async_trait]
pub trait FileProcessor: Send + Sync {
    /// Command name, for logs and reports
    fn name(&self) -> &'static str;

    fn walk_depth(&self) -> WalkDepth;

    /// Process one candidate. Skips are `Ok`; an `Err` aborts this file only.
    async fn process(&self, file: &Path) -> Result<FileOutcome, DomainError>;
}

/// Outcome of one file inside a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub elapsed_seconds: f64,
}

/// Everything a batch did, in processing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub command: String,
    pub working_directory: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    pub elapsed_seconds: f64,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_seconds)
    }

    pub fn succeeded(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Succeeded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|file| predicate(&file.outcome)).count()
    }

    /// `Total processing time: ...`
    pub fn summary_line(&self) -> String {
        format!("Total processing time: {}", format_elapsed(self.elapsed()))
    }

    /// Human-readable report
    pub fn render_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} in {} (started {}){}\n",
            self.command,
            self.working_directory.display(),
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            if self.dry_run { ", dry run" } else { "" }
        ));

        for file in &self.files {
            let status = match &file.outcome {
                FileOutcome::Skipped { reason } => format!("skipped: {}", reason),
                FileOutcome::Succeeded { simulated: true } => "simulated".to_string(),
                FileOutcome::Succeeded { simulated: false } => "done".to_string(),
                FileOutcome::Failed { reason, .. } => format!("failed: {}", reason),
            };
            output.push_str(&format!("  {}: {}\n", file.path.display(), status));
        }

        output.push_str(&format!(
            "{} files: {} succeeded, {} skipped, {} failed\n",
            self.files.len(),
            self.succeeded(),
            self.skipped(),
            self.failed()
        ));
        output.push_str(&self.summary_line());
        output
    }
}

/// Runs a [`FileProcessor`] over every candidate, strictly one at a time
pub struct BatchOrchestrator {
    working_directory: PathBuf,
    dry_run: bool,
}

impl BatchOrchestrator {
    pub fn new(config: &NormalizeConfig) -> Self {
        Self {
            working_directory: config.working_directory.clone(),
            dry_run: config.dry_run,
        }
    }

    /// A missing or non-directory working directory is the only fatal error
    pub fn validate(&self) -> NormalizeResult<()> {
        if self.working_directory.is_dir() {
            Ok(())
        } else {
            Err(NormalizeError::InvalidWorkingDirectory {
                path: self.working_directory.clone(),
            })
        }
    }

    /// Container files under the working directory, sorted by path
    pub fn discover(&self, depth: WalkDepth) -> Vec<PathBuf> {
        let walker = WalkDir::new(&self.working_directory).min_depth(1);
        let walker = match depth {
            WalkDepth::SingleLevel => walker.max_depth(1),
            WalkDepth::Recursive => walker,
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_container(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }

    pub async fn run(&self, processor: &dyn FileProcessor) -> NormalizeResult<BatchReport> {
        self.validate()?;

        let started_at = Local::now();
        let started = Instant::now();
        let candidates = self.discover(processor.walk_depth());
        info!(
            "{}: {} candidate file(s) in {}{}",
            processor.name(),
            candidates.len(),
            self.working_directory.display(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let mut files = Vec::with_capacity(candidates.len());
        for path in candidates {
            info!("Processing {}", path.display());
            let file_started = Instant::now();

            let outcome = match processor.process(&path).await {
                Ok(outcome) => outcome,
                Err(e) => FileOutcome::failed(&e),
            };
            let elapsed = file_started.elapsed();

            match &outcome {
                FileOutcome::Skipped { reason } => {
                    info!("Skipped {}: {}", path.display(), reason)
                }
                FileOutcome::Failed { reason, .. } => {
                    error!("Failed {}: {}", path.display(), reason)
                }
                FileOutcome::Succeeded { .. } => {}
            }
            info!("{} finished in {}", path.display(), format_elapsed(elapsed));

            files.push(FileReport {
                path,
                outcome,
                elapsed_seconds: elapsed.as_secs_f64(),
            });
        }

        let report = BatchReport {
            command: processor.name().to_string(),
            working_directory: self.working_directory.clone(),
            dry_run: self.dry_run,
            started_at,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            files,
        };
        info!("{}", report.summary_line());
        Ok(report)
    }
}
