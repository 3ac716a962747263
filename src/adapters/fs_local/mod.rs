// Local filesystem adapter - File system operations through tokio::fs

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, DomainError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::fs(path, e))
    }

    async fn create_directory(&self, path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| DomainError::fs(path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        // Replaces `to` in one step
        fs::rename(from, to)
            .await
            .map_err(|e| DomainError::fs(from, e))
    }

    async fn remove_file_if_exists(&self, path: &Path) -> Result<bool, DomainError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::fs(path, e)),
        }
    }
}
