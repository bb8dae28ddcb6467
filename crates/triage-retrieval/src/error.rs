//! Retrieval error types

use thiserror::Error;

/// Errors that can occur while retrieving similar cases
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Required settings are missing
    #[error("Retrieval not configured: {0}")]
    NotConfigured(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Service replied with an unexpected body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Case fixture could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Case fixture is not valid JSON
    #[error("Invalid case data: {0}")]
    Parse(#[from] serde_json::Error),
}
