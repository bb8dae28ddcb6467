//! Provider settings read from the environment

use crate::LlmError;
use std::fmt;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "LLMOD_API_KEY";

/// Environment variable holding the OpenAI-compatible base URL
pub const ENV_BASE_URL: &str = "LLMOD_BASE_URL";

/// Environment variable naming the chat model
pub const ENV_CHAT_MODEL: &str = "CHAT_MODEL";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Sampling temperature for dispatch decisions
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Connection settings for a chat completions endpoint
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    /// Bearer token
    pub api_key: String,

    /// Base URL, e.g. `https://api.example.com/v1`
    pub base_url: String,

    /// Chat model name
    pub chat_model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    pub max_retries: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl LlmConfig {
    /// Create a configuration with default timeout, retries and temperature
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            chat_model: chat_model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Read `LLMOD_API_KEY`, `LLMOD_BASE_URL` and `CHAT_MODEL` from the process environment
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&str> = [ENV_API_KEY, ENV_BASE_URL, ENV_CHAT_MODEL]
            .into_iter()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(LlmError::NotConfigured(format!("missing {}", missing.join(" / "))));
        }

        Ok(Self::new(
            get(ENV_API_KEY).unwrap_or_default(),
            get(ENV_BASE_URL).unwrap_or_default(),
            get(ENV_CHAT_MODEL).unwrap_or_default(),
        ))
    }

    /// Set the per-request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("temperature", &self.temperature)
            .finish()
    }
}
