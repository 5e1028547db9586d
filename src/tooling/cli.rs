//! CLI Tooling
//!
//! Command-line triggers for the two export kinds, plus an inspection command for the
//! effective configuration.

use crate::config::{ConfigLoader, ExportConfig};
use crate::error::ExportError;
use crate::export::ExportService;
use crate::logging::LoggingConfig;
use crate::types::ExportKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// catalog-export - Repository and catalog exporter for the content platform
#[derive(Parser, Debug)]
#[command(name = "catalog-export")]
#[command(about = "Export repository images and catalog categories to a content import file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export category banners and browse page entries
    Categories {
        /// Also write the generated document to stdout
        #[arg(long)]
        print: bool,
    },
    /// Export product images
    Products {
        /// Also write the generated document to stdout
        #[arg(long)]
        print: bool,
    },
    /// Show the effective configuration with secrets redacted
    Config,
}

impl Cli {
    /// Apply logging flags on top of the loaded configuration.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

/// CLI context holding the loaded configuration and the runtime exports run on
pub struct CliContext {
    config: ExportConfig,
    runtime: Runtime,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ExportError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => {
                let working_dir = std::env::current_dir()?;
                ConfigLoader::load(&working_dir)?
            }
        };
        Self::with_config(config)
    }

    pub fn with_config(config: ExportConfig) -> Result<Self, ExportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExportConfig {
        &mut self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ExportError> {
        match command {
            Commands::Categories { print } => self.run_export(ExportKind::Categories, *print),
            Commands::Products { print } => self.run_export(ExportKind::Products, *print),
            Commands::Config => toml::to_string_pretty(&self.config.redacted())
                .map_err(|e| ExportError::SerializationFailure(e.to_string())),
        }
    }

    fn run_export(&self, kind: ExportKind, print: bool) -> Result<String, ExportError> {
        let service = ExportService::from_config(self.config.clone())?;
        let report = self.runtime.block_on(async {
            service.bootstrap().await?;
            service.run(kind).await
        })?;

        let mut output = report.summary();
        if print {
            output.push('\n');
            output.push_str(&report.body);
        }
        Ok(output)
    }
}
