pub mod service;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder seeded with the defaults that cannot live on serde attributes.
///
/// Section structs all carry serde defaults, so only the logging level is seeded here
/// to keep an empty environment deserializable into a complete `LoggingConfig`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("logging.level", "info")
}
