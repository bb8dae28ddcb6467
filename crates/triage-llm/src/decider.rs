//! LLM-backed dispatch decisions
//!
//! The model is asked for a strict JSON object with the same shape as the
//! deterministic engine's output. Whatever comes back is normalized: unknown
//! urgency falls back to `medium`, confidence is clamped and rounded, and
//! missing text fields get fixed defaults. A reply that is not a JSON object
//! is an error; the caller decides whether to fall back.

use crate::LlmError;
use serde_json::{json, Map, Value};
use std::fmt::Display;
use tracing::{debug, info};
use triage_domain::confidence_computation::round2;
use triage_domain::traits::LlmProvider;
use triage_domain::{Decision, EvidenceSummary, ParsedComplaint, Urgency};

/// Complaint text sent to the model is cut to this many characters
pub const MAX_COMPLAINT_CHARS: usize = 800;

const DEFAULT_AGENCY: &str = "UNKNOWN";
const DEFAULT_ACTION: &str = "Create ticket for review";
const DEFAULT_JUSTIFICATION: &str = "LLM decision (no justification provided).";
const DEFAULT_CONFIDENCE: f64 = 0.5;

const SYSTEM_PROMPT: &str = "You are a municipal 311 dispatch assistant. \
Return ONLY valid JSON (no markdown). \
JSON keys must be exactly: agency, urgency, action, justification, confidence. \
urgency must be one of: low, medium, high. \
confidence must be a number between 0 and 1.";

const TASK: &str = "Decide the best agency + urgency + recommended action for dispatch.";

/// Produces decisions by prompting a language model
pub struct LlmDecider<P> {
    provider: P,
}

impl<P> LlmDecider<P>
where
    P: LlmProvider,
    P::Error: Display,
{
    /// Create a new decider around a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The fixed system prompt
    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Build the user message: truncated complaint, parsed fields and compact evidence
    pub fn build_user_message(parsed: &ParsedComplaint, evidence: Option<&EvidenceSummary>) -> Value {
        let complaint_text: String = parsed.complaint_text.chars().take(MAX_COMPLAINT_CHARS).collect();
        let (agency_counts, total_matches, top_score) = match evidence {
            Some(ev) => (
                serde_json::to_value(&ev.agency_counts).unwrap_or_else(|_| json!({})),
                ev.total_matches,
                ev.top_score,
            ),
            None => (json!({}), 0, None),
        };

        json!({
            "complaint_text": complaint_text,
            "parsed": {
                "category": parsed.category.as_str(),
                "location": parsed.any_location().unwrap_or_default(),
                "borough": parsed.borough.map(|b| b.filter_value()).unwrap_or_default(),
                "time_24h": parsed.time_24h.map(|t| t.to_string()).unwrap_or_default(),
                "recurrence": parsed.recurrence.as_deref().unwrap_or_default(),
            },
            "evidence_summary": {
                "agency_counts": agency_counts,
                "total_matches": total_matches,
                "top_score": top_score,
            },
            "task": TASK,
        })
    }

    /// Ask the model for a decision
    pub async fn decide(
        &self,
        parsed: &ParsedComplaint,
        evidence: Option<&EvidenceSummary>,
    ) -> Result<Decision, LlmError> {
        let user = Self::build_user_message(parsed, evidence).to_string();
        debug!("LLM user message: {} chars", user.len());

        let reply = self
            .provider
            .complete(SYSTEM_PROMPT, &user)
            .await
            .map_err(|e| LlmError::Communication(e.to_string()))?;

        let decision = parse_decision(&reply)?;
        info!(
            "LLM decision from {}: agency={}, urgency={}, confidence={:.2}",
            self.provider.model_name(),
            decision.agency,
            decision.urgency,
            decision.confidence
        );
        Ok(decision)
    }
}

/// Parse and normalize a model reply into a decision
pub fn parse_decision(reply: &str) -> Result<Decision, LlmError> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body).map_err(|_| non_json(reply))?;
    let object = value.as_object().ok_or_else(|| non_json(reply))?;

    let urgency = object
        .get("urgency")
        .and_then(Value::as_str)
        .and_then(Urgency::parse)
        .unwrap_or(Urgency::Medium);

    let confidence = object
        .get("confidence")
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE);

    Ok(Decision {
        agency: text_field(object, "agency", DEFAULT_AGENCY),
        urgency,
        action: text_field(object, "action", DEFAULT_ACTION),
        justification: text_field(object, "justification", DEFAULT_JUSTIFICATION),
        confidence: round2(confidence.clamp(0.0, 1.0)),
    })
}

fn text_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn non_json(reply: &str) -> LlmError {
    let preview: String = reply.chars().take(200).collect();
    LlmError::InvalidResponse(format!("LLM returned non-JSON: {}", preview))
}

/// Remove a surrounding ```json ... ``` fence, if any
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
