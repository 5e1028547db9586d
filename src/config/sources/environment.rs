//! Environment variable source: CATALOG_EXPORT__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Environment variable prefix, e.g. `CATALOG_EXPORT__CATALOG__CLIENT_SECRET`
pub const ENV_PREFIX: &str = "CATALOG_EXPORT";

/// Add environment variable overlay to builder.
/// Uses CATALOG_EXPORT prefix and __ as separator for nested keys.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
