//! OpenAI-compatible embeddings client

use crate::http::{post_json, RetryPolicy};
use crate::{RetrievalConfig, RetrievalError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for an `/embeddings` endpoint
pub struct EmbeddingClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    policy: RetryPolicy,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a client from the retrieval configuration
    pub fn new(config: &RetrievalConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RetrievalError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.embeddings_url(),
            api_key: config.api_key.clone(),
            model: config.embedding_model.clone(),
            policy: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base: Duration::from_secs(1),
            },
        })
    }

    /// Set the first backoff delay; later delays double
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.policy.backoff_base = backoff_base;
        self
    }

    /// Embed a batch of texts, returning one vector per input in input order
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbeddingResponse = post_json(
            || self.client.post(&self.url).bearer_auth(&self.api_key).json(&body),
            self.policy,
            "embeddings",
        )
        .await?;

        if response.data.len() != texts.len() {
            return Err(RetrievalError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));
        debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    /// Embed a single text
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        self.embed(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| RetrievalError::InvalidResponse("empty embedding response".to_string()))
    }
}
