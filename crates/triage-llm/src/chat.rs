//! OpenAI-compatible chat completions provider
//!
//! # Features
//!
//! - Async HTTP communication with any `/chat/completions` endpoint
//! - Bearer authentication
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use triage_llm::{ChatCompletionsProvider, LlmConfig};
//!
//! let config = LlmConfig::new("sk-...", "https://api.example.com/v1", "gpt-4o-mini");
//! let provider = ChatCompletionsProvider::new(config).unwrap();
//! ```

use crate::{LlmConfig, LlmError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use triage_domain::traits::LlmProvider;

/// Chat completions provider
pub struct ChatCompletionsProvider {
    config: LlmConfig,
    client: reqwest::Client,
    backoff_base: Duration,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Set the first backoff delay; later delays double
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Get the active configuration
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one system + user exchange and return the first choice's content
    ///
    /// A reply with no content is returned as `"{}"`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Credentials are rejected (not retried)
    /// - The model does not exist (not retried)
    /// - Every attempt fails with a network, rate-limit or server error
    /// - The response body is not a chat completion
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = self.config.completions_url();
        let request_body = ChatRequest {
            model: &self.config.chat_model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.config.temperature,
        };

        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < max_attempts {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        let content = body
                            .choices
                            .into_iter()
                            .next()
                            .ok_or_else(|| LlmError::InvalidResponse("No choices returned".to_string()))?
                            .message
                            .content
                            .unwrap_or_else(|| "{}".to_string());
                        debug!("Chat completion returned {} chars", content.len());
                        return Ok(content);
                    } else if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(LlmError::Authentication(format!("HTTP {}", status)));
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.config.chat_model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < max_attempts {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = self.backoff_base * 2u32.pow(attempts - 1);
                warn!("Chat completion attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn complete(&self, system: &str, user: &str) -> Result<String, Self::Error> {
        self.chat(system, user).await
    }

    fn model_name(&self) -> &str {
        &self.config.chat_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn provider(base_url: String, max_retries: u32) -> ChatCompletionsProvider {
        let config = LlmConfig::new("sk-test", base_url, "test-model").with_max_retries(max_retries);
        ChatCompletionsProvider::new(config)
            .unwrap()
            .with_backoff_base(Duration::from_millis(5))
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider("http://localhost:1".to_string(), 3);
        assert_eq!(provider.model_name(), "test-model");
        assert_eq!(provider.config().temperature, 0.1);
    }

    #[tokio::test]
    async fn test_chat_sends_messages_and_returns_content() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "hello");
                Json(json!({"choices": [{"message": {"role": "assistant", "content": "{\"agency\":\"DSNY\"}"}}]}))
            }),
        );
        let base_url = serve(app).await;

        let reply = provider(base_url, 1).complete("be terse", "hello").await.unwrap();
        assert_eq!(reply, "{\"agency\":\"DSNY\"}");
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "busy"})))
                    } else {
                        (StatusCode::OK, Json(json!({"choices": [{"message": {"content": "ok"}}]})))
                    }
                }
            }),
        );
        let base_url = serve(app).await;

        let reply = provider(base_url, 3).chat("s", "u").await.unwrap();
        assert_eq!(reply, "ok");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_authentication_failure_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { StatusCode::UNAUTHORIZED }
            }),
        );
        let base_url = serve(app).await;

        let result = provider(base_url, 3).chat("s", "u").await;
        assert!(matches!(result, Err(LlmError::Authentication(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_content_becomes_empty_object() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": [{"message": {"content": null}}]})) }),
        );
        let base_url = serve(app).await;

        assert_eq!(provider(base_url, 1).chat("s", "u").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let result = provider("http://127.0.0.1:9/v1".to_string(), 2).chat("s", "u").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
