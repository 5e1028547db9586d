//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::ExportConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `catalog-export.toml` in `working_dir` (if present) and environment.
    pub fn load(working_dir: &Path) -> Result<ExportConfig, ConfigError> {
        MergeService::load(working_dir)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<ExportConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> ExportConfig {
        ExportConfig::default()
    }
}
