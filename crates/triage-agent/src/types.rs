//! Request, response and trace types for the Agent

use serde::{Deserialize, Serialize};
use serde_json::Value;
use triage_domain::{DraftDecision, Decision, EvidenceSummary, ParsedComplaint, ReasoningNote, ScoredDecision};
use triage_gatekeeper::ReviewVerdict;

/// Step module names, in pipeline order
pub mod modules {
    /// Signal extraction
    pub const PREPROCESSING: &str = "Preprocessing_ContextExtraction";
    /// Reasoning note
    pub const REASON: &str = "Reason_UnderstandComplaint";
    /// Similar-case retrieval
    pub const RETRIEVE: &str = "Act_RAG_RetrieveSimilarCases";
    /// Evidence summary
    pub const OBSERVE: &str = "Observe_SummarizeEvidence";
    /// Dispatch decision
    pub const DECIDE: &str = "Decide_DispatchDecision";
    /// Confidence threshold check
    pub const GATING: &str = "Confidence_Gating";
    /// Human review escalation
    pub const ESCALATION: &str = "Human_Review_Escalation";
    /// User-facing text
    pub const RESPONSE: &str = "Response_Generator";

    /// All modules, in order
    pub const ALL: [&str; 8] = [
        PREPROCESSING,
        REASON,
        RETRIEVE,
        OBSERVE,
        DECIDE,
        GATING,
        ESCALATION,
        RESPONSE,
    ];
}

/// A complaint as submitted through an intake form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintRecord {
    /// Identifier assigned by the intake system
    pub complaint_id: Option<String>,
    /// Free complaint text
    pub complaint_text: String,
    /// Borough selected on the form
    pub borough: Option<String>,
    /// Free-form location details
    pub location_details: Option<String>,
    /// Incident time as `HH:MM`
    pub incident_time: Option<String>,
    /// Caller's own urgency estimate; informational only
    pub urgency_hint: Option<String>,
}

/// Input to a triage run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteRequest {
    /// Free-text complaint
    pub prompt: Option<String>,
    /// Structured complaint record; takes precedence over `prompt`
    pub complaint: Option<ComplaintRecord>,
}

impl ExecuteRequest {
    /// Request for a free-text complaint
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            prompt: Some(text.into()),
            complaint: None,
        }
    }

    /// Request for a complaint record
    pub fn complaint(record: ComplaintRecord) -> Self {
        Self {
            prompt: None,
            complaint: Some(record),
        }
    }
}

/// One recorded pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Module name (see [`modules`])
    pub module: String,
    /// What the step was given
    pub prompt: Value,
    /// What the step produced
    pub response: Value,
}

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Completed
    Ok,
    /// Stopped at a failed step
    Error,
}

/// Which producer made the final decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// Deterministic confidence engine
    Engine,
    /// Language model
    Llm,
    /// Engine, after the language model failed
    EngineFallback,
}

impl DecisionSource {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Engine => "engine",
            DecisionSource::Llm => "llm",
            DecisionSource::EngineFallback => "engine_fallback",
        }
    }
}

/// Typed results of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    /// Intake record identifier, when the run started from a record
    pub complaint_id: Option<String>,
    /// Extracted signals
    pub parsed: ParsedComplaint,
    /// Preliminary decision
    pub draft: DraftDecision,
    /// Reasoning note
    pub reasoning: ReasoningNote,
    /// Evidence summary
    pub evidence: EvidenceSummary,
    /// Engine output; present whenever the engine ran
    pub scored: Option<ScoredDecision>,
    /// Final decision
    pub decision: Decision,
    /// Decision producer
    pub source: DecisionSource,
    /// Review gate verdict
    pub verdict: ReviewVerdict,
}

/// Response envelope: `{status, error, response, steps}`
///
/// The typed outcome is kept alongside for library callers and is not serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    /// Run status
    pub status: ExecutionStatus,
    /// Error message when the run failed
    pub error: Option<String>,
    /// User-facing decision text when the run completed
    pub response: Option<String>,
    /// Recorded steps
    pub steps: Vec<Step>,
    /// Typed results
    #[serde(skip)]
    pub outcome: Option<TriageOutcome>,
}

impl ExecutionResponse {
    /// Completed run
    pub fn ok(text: String, steps: Vec<Step>, outcome: TriageOutcome) -> Self {
        Self {
            status: ExecutionStatus::Ok,
            error: None,
            response: Some(text),
            steps,
            outcome: Some(outcome),
        }
    }

    /// Failed run
    pub fn error(message: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            error: Some(message.into()),
            response: None,
            steps,
            outcome: None,
        }
    }

    /// Whether the run completed
    pub fn is_ok(&self) -> bool {
        self.status == ExecutionStatus::Ok
    }

    /// Module names of the recorded steps, in order
    pub fn step_modules(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.module.as_str()).collect()
    }
}
