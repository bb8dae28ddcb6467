//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for the review gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Decisions below this confidence go to human review
    pub review_threshold: f64,

    /// Treat an unknown category as critical missing information
    pub require_category: bool,

    /// Treat a missing location as critical missing information
    pub require_location: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            review_threshold: 0.6,
            require_category: true,
            require_location: true,
        }
    }
}

impl GateConfig {
    /// Create a strict configuration (higher bar for automatic dispatch)
    pub fn strict() -> Self {
        Self {
            review_threshold: 0.75,
            require_category: true,
            require_location: true,
        }
    }

    /// Create a permissive configuration (only low confidence triggers review)
    pub fn permissive() -> Self {
        Self {
            review_threshold: 0.4,
            require_category: false,
            require_location: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.review_threshold) {
            return Err(format!(
                "review_threshold {} out of range [0.0, 1.0]",
                self.review_threshold
            ));
        }
        Ok(())
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
