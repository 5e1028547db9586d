//! Output document writes.

use crate::error::ExportError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `body` to `dir/file_name` through a temporary sibling and a rename, so readers
/// only ever see the previous document or the complete new one.
pub async fn write_atomic(dir: &Path, file_name: &str, body: &str) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(file_name);
    let staging = dir.join(format!(".{}.tmp", file_name));

    if let Err(e) = tokio::fs::write(&staging, body).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staging, &target).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    debug!(path = %target.display(), bytes = body.len(), "Wrote export document");
    Ok(target)
}
