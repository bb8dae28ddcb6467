//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Complaint text is empty or whitespace
    #[error("Complaint text is empty")]
    EmptyText,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
