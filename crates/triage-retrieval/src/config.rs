//! Retrieval settings read from the environment

use crate::RetrievalError;
use std::fmt;

/// Environment variable holding the embedding API key
pub const ENV_API_KEY: &str = "LLMOD_API_KEY";

/// Environment variable holding the OpenAI-compatible base URL
pub const ENV_BASE_URL: &str = "LLMOD_BASE_URL";

/// Environment variable naming the embedding model
pub const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";

/// Environment variable holding the vector index API key
pub const ENV_INDEX_API_KEY: &str = "PINECONE_API_KEY";

/// Environment variable holding the vector index host
pub const ENV_INDEX_HOST: &str = "PINECONE_INDEX_HOST";

/// Only cases with this status are retrieved unless configured otherwise
pub const DEFAULT_STATUS_FILTER: &str = "Closed";

/// Default timeout for each HTTP request (20 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings for the embedding service and vector index
#[derive(Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Embedding service bearer token
    pub api_key: String,

    /// Embedding service base URL
    pub base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Vector index API key
    pub index_api_key: String,

    /// Vector index host URL
    pub index_host: String,

    /// Required case status; `None` disables the status filter
    pub status_filter: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    pub max_retries: u32,
}

impl RetrievalConfig {
    /// Read the embedding and index settings from the process environment
    pub fn from_env() -> Result<Self, RetrievalError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as missing
    ///
    /// A host without a scheme is given `https://`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RetrievalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let required = [
            ENV_API_KEY,
            ENV_BASE_URL,
            ENV_EMBEDDING_MODEL,
            ENV_INDEX_API_KEY,
            ENV_INDEX_HOST,
        ];
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RetrievalError::NotConfigured(format!(
                "missing {}",
                missing.join(" / ")
            )));
        }

        let host = get(ENV_INDEX_HOST).unwrap_or_default();
        let index_host = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("https://{}", host)
        };

        Ok(Self {
            api_key: get(ENV_API_KEY).unwrap_or_default(),
            base_url: get(ENV_BASE_URL).unwrap_or_default(),
            embedding_model: get(ENV_EMBEDDING_MODEL).unwrap_or_default(),
            index_api_key: get(ENV_INDEX_API_KEY).unwrap_or_default(),
            index_host,
            status_filter: Some(DEFAULT_STATUS_FILTER.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the required case status
    pub fn with_status_filter(mut self, status: Option<String>) -> Self {
        self.status_filter = status;
        self
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

    /// Full URL of the embeddings endpoint
    pub fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    /// Full URL of the index query endpoint
    pub fn query_url(&self) -> String {
        format!("{}/query", self.index_host.trim_end_matches('/'))
    }
}

impl fmt::Debug for RetrievalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("index_api_key", &"<redacted>")
            .field("index_host", &self.index_host)
            .field("status_filter", &self.status_filter)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
