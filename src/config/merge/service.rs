//! MergeService: orchestrates sources, applies merge policy, deserializes to ExportConfig.

use crate::config::sources::{environment, file};
use crate::config::ExportConfig;
use config::ConfigError;
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the working directory and environment.
    /// Precedence: defaults (lowest) -> working directory file -> environment (highest).
    pub fn load(working_dir: &Path) -> Result<ExportConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = file::add_working_dir_file(builder, working_dir)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific (required) file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ExportConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = file::add_explicit_file(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
