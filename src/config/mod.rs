//! Export configuration.
//!
//! Layered with the `config` crate: serde defaults, then an optional
//! `catalog-export.toml` (or an explicit file), then `CATALOG_EXPORT__*` environment
//! variables. See [`ConfigLoader`].

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::types::{FailurePolicy, DEFAULT_PRODUCT_CAP};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "catalog-export.toml";

const REDACTED: &str = "<redacted>";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document repository connection and well-known node ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository base URL, e.g. `https://content.example.com`
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Root folder of the category tree; terminates banner lineage naming
    #[serde(default)]
    pub categories_node: String,
    /// Flat folder holding product images
    #[serde(default)]
    pub products_node: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Policy for failed folder listings during a walk
    #[serde(default = "default_tree_failure_policy")]
    pub failure_policy: FailurePolicy,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            categories_node: String::new(),
            products_node: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            failure_policy: default_tree_failure_policy(),
        }
    }
}

/// Commerce catalog connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_api_url")]
    pub api_url: String,
    #[serde(default = "default_catalog_auth_url")]
    pub auth_url: String,
    #[serde(default)]
    pub catalog_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_catalog_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_catalog_depth")]
    pub depth: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Policy for failed category pages
    #[serde(default = "default_catalog_failure_policy")]
    pub failure_policy: FailurePolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: default_catalog_api_url(),
            auth_url: default_catalog_auth_url(),
            catalog_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            scopes: default_catalog_scopes(),
            depth: default_catalog_depth(),
            request_timeout_secs: default_request_timeout_secs(),
            failure_policy: default_catalog_failure_policy(),
        }
    }
}

/// External snapshot producer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_program")]
    pub program: String,
    #[serde(default = "default_snapshot_args")]
    pub args: Vec<String>,
    /// File the producer writes
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
    /// `propagate` aborts the run on snapshot failure; `absorb` mints every id fresh
    #[serde(default = "default_snapshot_failure_policy")]
    pub on_failure: FailurePolicy,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            program: default_snapshot_program(),
            args: default_snapshot_args(),
            path: default_snapshot_path(),
            on_failure: default_snapshot_failure_policy(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum product images per export; `None` collects the whole folder
    #[serde(default = "default_product_cap")]
    pub product_cap: Option<usize>,
    /// Maximum walked assets kept for a category export
    #[serde(default)]
    pub category_asset_cap: Option<usize>,
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            product_cap: default_product_cap(),
            category_asset_cap: None,
            run_timeout_secs: default_run_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_run_timeout_secs() -> u64 {
    900
}

fn default_tree_failure_policy() -> FailurePolicy {
    FailurePolicy::Absorb
}

fn default_catalog_failure_policy() -> FailurePolicy {
    FailurePolicy::Propagate
}

fn default_snapshot_failure_policy() -> FailurePolicy {
    FailurePolicy::Propagate
}

fn default_catalog_api_url() -> String {
    "https://api.ordercloud.io".to_string()
}

fn default_catalog_auth_url() -> String {
    "https://auth.ordercloud.io".to_string()
}

fn default_catalog_scopes() -> Vec<String> {
    vec!["CatalogReader".to_string(), "CategoryReader".to_string()]
}

fn default_catalog_depth() -> String {
    "all".to_string()
}

fn default_snapshot_program() -> String {
    "contentful".to_string()
}

fn default_snapshot_args() -> Vec<String> {
    ["space", "export", "--config", "./export_config.json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("./exports/contentful.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_product_cap() -> Option<usize> {
    Some(DEFAULT_PRODUCT_CAP)
}

fn has_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl ExportConfig {
    /// Validate everything needed before any network call is made.
    pub fn validate(&self) -> Result<(), String> {
        let repo = &self.repository;
        if !has_scheme(repo.host.trim()) {
            return Err(format!("Invalid repository host: '{}'", repo.host));
        }
        for (field, value) in [
            ("repository.username", &repo.username),
            ("repository.password", &repo.password),
            ("repository.categories_node", &repo.categories_node),
            ("repository.products_node", &repo.products_node),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} cannot be empty", field));
            }
        }

        let catalog = &self.catalog;
        if !has_scheme(&catalog.api_url) || !has_scheme(&catalog.auth_url) {
            return Err("catalog.api_url and catalog.auth_url must be http(s) URLs".to_string());
        }
        for (field, value) in [
            ("catalog.catalog_id", &catalog.catalog_id),
            ("catalog.client_id", &catalog.client_id),
            ("catalog.client_secret", &catalog.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} cannot be empty", field));
            }
        }

        if self.snapshot.program.trim().is_empty() {
            return Err("snapshot.program cannot be empty".to_string());
        }
        if self.limits.product_cap == Some(0) {
            return Err("limits.product_cap must be positive when set".to_string());
        }
        if self.limits.run_timeout_secs == 0
            || repo.request_timeout_secs == 0
            || catalog.request_timeout_secs == 0
        {
            return Err("Timeouts must be positive".to_string());
        }
        Ok(())
    }

    /// Copy with credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.repository.password.is_empty() {
            copy.repository.password = REDACTED.to_string();
        }
        if !copy.catalog.client_secret.is_empty() {
            copy.catalog.client_secret = REDACTED.to_string();
        }
        copy
    }
}

#[cfg(test)]
pub(crate) fn valid_test_config() -> ExportConfig {
    let mut config = ExportConfig::default();
    config.repository.host = "https://content.example.com".to_string();
    config.repository.username = "admin".to_string();
    config.repository.password = "secret".to_string();
    config.repository.categories_node = "categories-root".to_string();
    config.repository.products_node = "products-root".to_string();
    config.catalog.catalog_id = "Garden".to_string();
    config.catalog.client_id = "client".to_string();
    config.catalog.client_secret = "shh".to_string();
    config
}
