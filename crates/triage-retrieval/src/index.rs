//! Pinecone-compatible vector index client

use crate::http::{post_json, RetryPolicy};
use crate::{RetrievalConfig, RetrievalError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use triage_domain::{CaseMetadata, CaseRecord};

/// Client for a vector index `/query` endpoint
pub struct VectorIndexClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    policy: RetryPolicy,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Value>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    metadata: Option<CaseMetadata>,
}

impl VectorIndexClient {
    /// Create a client from the retrieval configuration
    pub fn new(config: &RetrievalConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RetrievalError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.query_url(),
            api_key: config.index_api_key.clone(),
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

    /// Return the `top_k` nearest cases, with metadata, matching `filter`
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&Value>,
    ) -> Result<Vec<CaseRecord>, RetrievalError> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            filter,
        };

        let response: QueryResponse = post_json(
            || {
                self.client
                    .post(&self.url)
                    .header("Api-Key", &self.api_key)
                    .json(&body)
            },
            self.policy,
            "vector index",
        )
        .await?;

        debug!("Vector index returned {} matches", response.matches.len());
        Ok(response
            .matches
            .into_iter()
            .map(|m| CaseRecord {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect())
    }
}
