//! Triage Agent
//!
//! Runs a complaint through the full triage pipeline and records every step.
//!
//! # Architecture
//!
//! ```text
//! Request → Extract → Reason → Retrieve (timeout) → Summarize → Decide → Gate → Respond
//!                                                              ↑
//!                                          engine, or LLM with engine fallback
//! ```
//!
//! Every step is appended to the trace as `{module, prompt, response}`. A
//! failed step ends the run with an error envelope that still carries the
//! steps recorded so far.
//!
//! # Example Usage
//!
//! ```
//! use triage_agent::{AgentConfig, ExecuteRequest, ExecutionStatus, TriageAgent};
//! use triage_retrieval::StaticRetriever;
//!
//! let agent = TriageAgent::new(AgentConfig::default(), StaticRetriever::default()).unwrap();
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let response = rt.block_on(agent.execute(ExecuteRequest::prompt("huge pothole in Queens")));
//!
//! assert_eq!(response.status, ExecutionStatus::Ok);
//! assert_eq!(response.steps.len(), 8);
//! ```

#![warn(missing_docs)]

mod agent;
mod config;
mod error;
mod evaluation;
mod types;

pub use agent::{NoLlm, TriageAgent};
pub use config::{AgentConfig, DecisionMode};
pub use error::AgentError;
pub use evaluation::{evaluate_routing, EvaluationReport, RoutingMismatch, RoutingSample};
pub use types::{
    modules, ComplaintRecord, DecisionSource, ExecuteRequest, ExecutionResponse, ExecutionStatus,
    Step, TriageOutcome,
};
