//! Deterministic provider for tests and offline runs

use crate::LlmError;
use std::sync::{Arc, Mutex};
use triage_domain::traits::LlmProvider;

const ERROR_MARKER: &str = "ERROR";

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// response registered with [`MockProvider::add_response`] is used when its
/// key appears in the user message; otherwise the default response is returned.
///
/// # Examples
///
/// ```
/// use triage_llm::MockProvider;
/// use triage_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("pothole", r#"{"agency": "DOT"}"#);
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let reply = rt.block_on(provider.complete("system", "huge pothole")).unwrap();
/// assert_eq!(reply, r#"{"agency": "DOT"}"#);
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
    model: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all messages
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            model: "mock".to_string(),
        }
    }

    /// Add a response for user messages containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push((key.into(), response.into()));
    }

    /// Configure to return an error for user messages containing `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        self.add_response(key, ERROR_MARKER);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    fn respond(&self, user: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        let response = responses
            .iter()
            .find(|(key, _)| user.contains(key.as_str()))
            .map(|(_, response)| response.as_str())
            .unwrap_or(self.default_response.as_str());

        if response == ERROR_MARKER {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        Ok(response.to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, _system: &str, user: &str) -> Result<String, Self::Error> {
        self.respond(user)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
