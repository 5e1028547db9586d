//! Snapshot producer: the external command that exports the current space to disk.

use crate::config::SnapshotConfig;
use crate::error::ExportError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

#[async_trait]
pub trait SnapshotProducer: Send + Sync {
    /// Produce a fresh snapshot and return the path it was written to.
    async fn produce(&self) -> Result<PathBuf, ExportError>;
}

/// Runs `program args...` and reads the snapshot from `path` after a zero exit.
#[derive(Debug, Clone)]
pub struct CommandSnapshotProducer {
    program: String,
    args: Vec<String>,
    path: PathBuf,
}

impl CommandSnapshotProducer {
    pub fn new(program: impl Into<String>, args: Vec<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            path: path.into(),
        }
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.path.clone())
    }
}

#[async_trait]
impl SnapshotProducer for CommandSnapshotProducer {
    async fn produce(&self) -> Result<PathBuf, ExportError> {
        info!(program = %self.program, args = ?self.args, "Producing export snapshot");
        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ExportError::SnapshotFailure(format!(
                    "Failed to launch snapshot producer '{}': {}",
                    self.program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::SnapshotFailure(format!(
                "Snapshot producer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        debug!(path = %self.path.display(), "Snapshot producer finished");
        Ok(self.path.clone())
    }
}
