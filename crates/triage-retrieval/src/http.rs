//! JSON POST with bounded retry

use crate::RetrievalError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Retry policy shared by the HTTP clients
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
}

/// Send a request built by `build`, retrying network, rate-limit and server
/// errors with exponential backoff. Authentication failures are returned at once.
pub(crate) async fn post_json<T, F>(
    build: F,
    policy: RetryPolicy,
    service: &str,
) -> Result<T, RetrievalError>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let max_attempts = policy.max_retries.max(1);
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_attempts {
        match build().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<T>().await.map_err(|e| {
                        RetrievalError::InvalidResponse(format!("{}: {}", service, e))
                    });
                } else if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(RetrievalError::Authentication(format!(
                        "{} returned HTTP {}",
                        service, status
                    )));
                } else if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(RetrievalError::Communication(format!(
                        "{} HTTP {}: {}",
                        service, status, error_text
                    )));
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(RetrievalError::Communication(format!(
                        "{} HTTP {}: {}",
                        service, status, error_text
                    )));
                }
            }
            Err(e) => {
                last_error = Some(RetrievalError::Communication(format!(
                    "{} request failed: {}",
                    service, e
                )));
            }
        }

        attempts += 1;
        if attempts < max_attempts {
            // Exponential backoff: 1s, 2s, 4s, etc.
            let delay = policy.backoff_base * 2u32.pow(attempts - 1);
            warn!("{} attempt {} failed, retrying in {:?}", service, attempts, delay);
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        RetrievalError::Communication(format!("{}: max retries exceeded", service))
    }))
}
