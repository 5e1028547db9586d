//! Error types for the export pipeline.

use thiserror::Error;

/// Errors surfaced by sources, the walker, and the export orchestrator.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Startup login to the repository or catalog failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    /// Trigger rejected because startup authentication failed earlier
    #[error("Exports are blocked: {0}")]
    Blocked(String),

    /// A single remote call failed (status, transport, decode or timeout)
    #[error("Remote fetch failed: {0}")]
    RemoteFetchFailure(String),

    /// Snapshot producer failed, or its output could not be read or parsed
    #[error("Snapshot failure: {0}")]
    SnapshotFailure(String),

    /// Output document could not be serialized
    #[error("Serialization failure: {0}")]
    SerializationFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Another export is already in flight
    #[error("An export is already running")]
    RunInProgress,

    /// The overall run deadline elapsed
    #[error("Export timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ExportError {
    fn from(err: config::ConfigError) -> Self {
        ExportError::ConfigError(err.to_string())
    }
}

impl ExportError {
    /// Wrap a reqwest error raised while talking to `source`.
    pub fn remote(source: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExportError::RemoteFetchFailure(format!("{} request timed out: {}", source, err))
        } else {
            ExportError::RemoteFetchFailure(format!("{} request failed: {}", source, err))
        }
    }
}
