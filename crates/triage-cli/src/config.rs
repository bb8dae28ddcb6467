//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use triage_agent::AgentConfig;

/// CLI configuration.
///
/// ```toml
/// [settings]
/// color = false
/// format = "json"
///
/// [agent]
/// top_k = 5
/// decision_mode = "llm"
///
/// [agent.gate]
/// review_threshold = 0.7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Pipeline configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON envelope
    Json,
}

impl Config {
    /// Load configuration from a file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };
        config.agent.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: default_true(),
            format: default_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}
