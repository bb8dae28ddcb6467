//! Triage CLI library.
//!
//! This library provides the core functionality for the `triage` command-line
//! interface, including configuration loading, command execution, and output
//! formatting.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use config::{Config, OutputFormat, Settings};
pub use output::Formatter;
