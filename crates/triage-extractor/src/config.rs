//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Configuration for signal extraction and draft assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Seed confidence for complaints with a recognized category
    pub categorized_seed: f64,

    /// Seed confidence for complaints classified as unknown
    pub unknown_seed: f64,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, seed) in [
            ("categorized_seed", self.categorized_seed),
            ("unknown_seed", self.unknown_seed),
        ] {
            if !(0.0..=1.0).contains(&seed) {
                return Err(format!("{} {} out of range [0.0, 1.0]", name, seed));
            }
        }
        if self.unknown_seed > self.categorized_seed {
            return Err("unknown_seed cannot exceed categorized_seed".to_string());
        }
        Ok(())
    }

    /// Seed confidence for a category
    pub fn seed_for(&self, unknown: bool) -> f64 {
        if unknown {
            self.unknown_seed
        } else {
            self.categorized_seed
        }
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            categorized_seed: 0.70,
            unknown_seed: 0.35,
        }
    }
}

impl ExtractorConfig {
    /// Conservative preset: lower seeds, so only corroborated complaints clear review
    pub fn conservative() -> Self {
        Self {
            categorized_seed: 0.55,
            unknown_seed: 0.30,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
