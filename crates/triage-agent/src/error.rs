//! Error types for the Agent

use thiserror::Error;
use triage_extractor::ExtractorError;

/// Errors that can end a triage run
#[derive(Error, Debug)]
pub enum AgentError {
    /// Neither a complaint record nor a prompt was supplied
    #[error("Provide either a complaint record or a non-empty prompt.")]
    EmptyRequest,

    /// Signal extraction rejected the text
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractorError),

    /// Retrieval service failed
    #[error("RAG retrieval failed: {0}")]
    Retrieval(String),

    /// Retrieval did not finish in time
    #[error("RAG retrieval failed: timed out after {0}s")]
    RetrievalTimeout(u64),

    /// A routing sample could not be parsed
    #[error("Invalid sample on line {line}: {source}")]
    Sample {
        /// 1-based line number
        line: usize,
        /// Parse failure
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
