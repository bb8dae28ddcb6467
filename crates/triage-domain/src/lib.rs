//! Triage Domain Layer
//!
//! This crate contains the core decision logic and domain model for complaint
//! triage. It defines the value objects that flow through the pipeline, the
//! deterministic confidence engine, and the trait interfaces for the external
//! collaborators (case retrieval, language models).
//!
//! ## Key Concepts
//!
//! - **ParsedComplaint**: Structured signals pulled out of free complaint text
//! - **DraftDecision**: Preliminary agency/urgency/action guess with a seed confidence
//! - **EvidenceSummary**: Agency votes and similarity scores from historical cases
//! - **Decision**: The final dispatch decision with a justification trace
//! - **ReasoningNote**: Informational intent, constraints and missing fields
//!
//! ## Architecture
//!
//! - Pure, synchronous decision logic only
//! - Every request owns its values; nothing is shared or mutated across calls
//! - Infrastructure implementations (HTTP retrieval, LLM clients) live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod clock;
pub mod complaint;
pub mod confidence_computation;
pub mod decision;
pub mod evidence;
pub mod formatting;
pub mod reasoning;
pub mod traits;

// Re-exports for convenience
pub use category::{Borough, Category};
pub use clock::ClockTime;
pub use complaint::ParsedComplaint;
pub use confidence_computation::{compute_decision, ConfidenceConfig, FusionOutcome, ScoredDecision};
pub use decision::{Decision, DraftDecision, Urgency};
pub use evidence::{summarize_evidence, AgencyCounts, CaseMetadata, CaseRecord, CaseSummary, EvidenceSummary};
pub use formatting::format_user_response;
pub use reasoning::{build_reasoning, ReasoningNote};
