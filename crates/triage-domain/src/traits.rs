//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the decision core and
//! infrastructure. Implementations live in other crates.

use crate::{CaseRecord, ParsedComplaint};
use std::future::Future;

/// Trait for retrieving similar historical cases
///
/// Implemented by the infrastructure layer (triage-retrieval)
pub trait CaseRetriever {
    /// Error type for retrieval operations
    type Error;

    /// Return up to `top_k` historical cases ranked by similarity
    fn retrieve(
        &self,
        parsed: &ParsedComplaint,
        top_k: usize,
    ) -> impl Future<Output = Result<Vec<CaseRecord>, Self::Error>> + Send;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (triage-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Complete a chat exchange made of one system and one user message
    fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier, for step traces
    fn model_name(&self) -> &str;
}
