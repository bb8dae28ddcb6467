//! `CaseRetriever` implementations

use crate::query::{build_filter, build_query_text};
use crate::{EmbeddingClient, RetrievalConfig, RetrievalError, VectorIndexClient};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use triage_domain::traits::CaseRetriever;
use triage_domain::{CaseRecord, ParsedComplaint};

/// Embeds the complaint and queries the vector index
pub struct VectorRetriever {
    embedder: EmbeddingClient,
    index: VectorIndexClient,
    status_filter: Option<String>,
}

impl VectorRetriever {
    /// Create a retriever from the retrieval configuration
    pub fn new(config: &RetrievalConfig) -> Result<Self, RetrievalError> {
        Ok(Self {
            embedder: EmbeddingClient::new(config)?,
            index: VectorIndexClient::new(config)?,
            status_filter: config.status_filter.clone(),
        })
    }

    /// Create a retriever from `LLMOD_*`, `EMBEDDING_MODEL` and `PINECONE_*` variables
    pub fn from_env() -> Result<Self, RetrievalError> {
        Self::new(&RetrievalConfig::from_env()?)
    }

    /// Set the first backoff delay for both clients
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.embedder = self.embedder.with_backoff_base(backoff_base);
        self.index = self.index.with_backoff_base(backoff_base);
        self
    }

    /// Retrieve similar cases
    pub async fn search(
        &self,
        parsed: &ParsedComplaint,
        top_k: usize,
    ) -> Result<Vec<CaseRecord>, RetrievalError> {
        let query_text = build_query_text(parsed);
        let vector = self.embedder.embed_one(&query_text).await?;
        let filter = build_filter(parsed, self.status_filter.as_deref());

        let cases = self.index.query(&vector, top_k, filter.as_ref()).await?;
        info!("Retrieved {} similar cases (top_k={})", cases.len(), top_k);
        Ok(cases)
    }
}

impl CaseRetriever for VectorRetriever {
    type Error = RetrievalError;

    async fn retrieve(
        &self,
        parsed: &ParsedComplaint,
        top_k: usize,
    ) -> Result<Vec<CaseRecord>, Self::Error> {
        self.search(parsed, top_k).await
    }
}

/// Serves a fixed list of cases, in order
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    cases: Vec<CaseRecord>,
}

impl StaticRetriever {
    /// Create a retriever over the given cases
    pub fn new(cases: Vec<CaseRecord>) -> Self {
        Self { cases }
    }

    /// Parse a JSON array of cases
    pub fn from_json(json: &str) -> Result<Self, RetrievalError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a JSON array of cases from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The cases served
    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }
}

impl CaseRetriever for StaticRetriever {
    type Error = RetrievalError;

    async fn retrieve(
        &self,
        _parsed: &ParsedComplaint,
        top_k: usize,
    ) -> Result<Vec<CaseRecord>, Self::Error> {
        Ok(self.cases.iter().take(top_k).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use triage_domain::{Borough, CaseMetadata, Category};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base: &str) -> RetrievalConfig {
        let base = base.to_string();
        RetrievalConfig::from_lookup(move |name| {
            Some(match name {
                "LLMOD_BASE_URL" => format!("{}/v1", base),
                "PINECONE_INDEX_HOST" => base.clone(),
                _ => "test-value".to_string(),
            })
        })
        .unwrap()
    }

    fn parsed() -> ParsedComplaint {
        let mut parsed = ParsedComplaint::new("loud party every weekend", Category::Noise);
        parsed.borough = Some(Borough::Brooklyn);
        parsed
    }

    #[tokio::test]
    async fn test_vector_retriever_end_to_end() {
        let app = Router::new()
            .route(
                "/v1/embeddings",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["input"][0], "loud party every weekend");
                    Json(json!({"data": [{"index": 0, "embedding": [0.1, 0.2, 0.3]}]}))
                }),
            )
            .route(
                "/query",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["api-key"], "test-value");
                    assert_eq!(body["topK"], 2);
                    assert_eq!(body["includeMetadata"], true);
                    assert_eq!(body["filter"]["borough"]["$eq"], "BROOKLYN");
                    assert_eq!(body["filter"]["status"]["$eq"], "Closed");
                    Json(json!({"matches": [
                        {"id": "a", "score": 0.74, "metadata": {"agency": "NYPD", "status": "Closed", "borough": "BROOKLYN"}},
                        {"id": "b", "score": 0.61}
                    ]}))
                }),
            );
        let base = serve(app).await;

        let retriever = VectorRetriever::new(&config(&base)).unwrap();
        let cases = retriever.retrieve(&parsed(), 2).await.unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id, "a");
        assert_eq!(cases[0].metadata.agency.as_deref(), Some("NYPD"));
        assert_eq!(cases[1].metadata, CaseMetadata::default());
    }

    #[tokio::test]
    async fn test_embedding_failure_is_retried_then_reported() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/embeddings",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { StatusCode::BAD_GATEWAY }
            }),
        );
        let base = serve(app).await;

        let retriever = VectorRetriever::new(&config(&base).with_max_retries(3))
            .unwrap()
            .with_backoff_base(Duration::from_millis(5));
        let result = retriever.retrieve(&parsed(), 3).await;

        assert!(matches!(result, Err(RetrievalError::Communication(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_index_auth_failure() {
        let app = Router::new()
            .route(
                "/v1/embeddings",
                post(|| async { Json(json!({"data": [{"embedding": [1.0]}]})) }),
            )
            .route("/query", post(|| async { StatusCode::UNAUTHORIZED }));
        let base = serve(app).await;

        let retriever = VectorRetriever::new(&config(&base)).unwrap();
        let result = retriever.retrieve(&parsed(), 3).await;
        assert!(matches!(result, Err(RetrievalError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_static_retriever_limits_to_top_k() {
        let retriever = StaticRetriever::from_json(
            r#"[{"id": "1", "score": 0.9}, {"id": "2", "score": 0.8}, {"id": "3", "score": 0.7}]"#,
        )
        .unwrap();

        let cases = retriever.retrieve(&parsed(), 2).await.unwrap();
        let ids: Vec<&str> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_static_retriever_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "x", "metadata": {{"agency": "DEP"}}}}]"#).unwrap();

        let retriever = StaticRetriever::from_file(file.path()).unwrap();
        assert_eq!(retriever.cases().len(), 1);
        assert_eq!(retriever.cases()[0].score, None);
    }

    #[test]
    fn test_static_retriever_bad_json() {
        assert!(matches!(
            StaticRetriever::from_json("{not json"),
            Err(RetrievalError::Parse(_))
        ));
    }
}
