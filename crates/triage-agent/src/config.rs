//! Configuration for the Agent

use serde::{Deserialize, Serialize};
use triage_domain::ConfidenceConfig;
use triage_extractor::ExtractorConfig;
use triage_gatekeeper::GateConfig;

/// Which component produces the dispatch decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionMode {
    /// Deterministic confidence engine
    #[default]
    Engine,
    /// Language model, falling back to the engine on failure
    Llm,
}

/// Configuration for the whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Number of similar cases to retrieve
    pub top_k: usize,

    /// Timeout for the retrieval step (seconds)
    pub retrieval_timeout_secs: u64,

    /// Timeout for the LLM decision (seconds)
    pub llm_timeout_secs: u64,

    /// Decision producer
    pub decision_mode: DecisionMode,

    /// Signal extraction and draft seeds
    pub extractor: ExtractorConfig,

    /// Evidence fusion thresholds
    pub confidence: ConfidenceConfig,

    /// Review gate policy
    pub gate: GateConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            retrieval_timeout_secs: 30,
            llm_timeout_secs: 60,
            decision_mode: DecisionMode::Engine,
            extractor: ExtractorConfig::default(),
            confidence: ConfidenceConfig::default(),
            gate: GateConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Conservative preset: lower seeds and a stricter review gate
    pub fn conservative() -> Self {
        Self {
            extractor: ExtractorConfig::conservative(),
            gate: GateConfig::strict(),
            ..Self::default()
        }
    }

    /// Validate the configuration and every nested section
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if self.retrieval_timeout_secs == 0 {
            return Err("retrieval_timeout_secs must be greater than 0".to_string());
        }
        if self.llm_timeout_secs == 0 {
            return Err("llm_timeout_secs must be greater than 0".to_string());
        }
        self.extractor.validate().map_err(|e| format!("extractor: {}", e))?;
        self.confidence.validate().map_err(|e| format!("confidence: {}", e))?;
        self.gate.validate().map_err(|e| format!("gate: {}", e))?;
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
