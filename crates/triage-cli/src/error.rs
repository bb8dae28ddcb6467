//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Agent error
    #[error("{0}")]
    Agent(#[from] triage_agent::AgentError),

    /// Retrieval setup error
    #[error("{0}")]
    Retrieval(#[from] triage_retrieval::RetrievalError),

    /// LLM setup error
    #[error("{0}")]
    Llm(#[from] triage_llm::LlmError),

    /// Triage run ended in an error envelope
    #[error("{0}")]
    Execution(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
