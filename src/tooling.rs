//! Tooling & Integration Layer
//!
//! Command-line entry points over the export service.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
