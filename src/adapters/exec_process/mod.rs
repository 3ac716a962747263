//! Subprocess execution adapter

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Runs tool invocations as child processes and captures their output
pub struct ProcessAdapter;

impl ProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutePort for ProcessAdapter {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError> {
        debug!(command = %invocation.command_line(), "Running {}", invocation.tool);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DomainError::Spawn {
                tool: invocation.tool.to_string(),
                source,
            })?;

        debug!(tool = %invocation.tool, code = ?output.status.code(), "Tool exited");

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
