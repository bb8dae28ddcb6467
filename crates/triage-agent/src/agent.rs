//! Core Agent implementation

use crate::config::{AgentConfig, DecisionMode};
use crate::error::AgentError;
use crate::types::{
    modules, ComplaintRecord, DecisionSource, ExecuteRequest, ExecutionResponse, Step,
    TriageOutcome,
};
use serde_json::{json, Value};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use triage_domain::traits::{CaseRetriever, LlmProvider};
use triage_domain::{
    build_reasoning, compute_decision, format_user_response, summarize_evidence, Borough, ClockTime,
    Decision, EvidenceSummary, ParsedComplaint, ScoredDecision,
};
use triage_extractor::{ComplaintContext, SignalExtractor};
use triage_gatekeeper::ReviewGate;
use triage_llm::{LlmDecider, LlmError};

/// Placeholder provider for agents built without a language model
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLlm;

impl LlmProvider for NoLlm {
    type Error = LlmError;

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, Self::Error> {
        Err(LlmError::NotConfigured("no provider attached".to_string()))
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

/// Runs complaints through extraction, retrieval, decision and review gating
pub struct TriageAgent<R, L = NoLlm> {
    extractor: SignalExtractor,
    retriever: R,
    decider: Option<LlmDecider<L>>,
    gate: ReviewGate,
    config: AgentConfig,
}

impl<R> TriageAgent<R, NoLlm>
where
    R: CaseRetriever,
    R::Error: Display,
{
    /// Create a new agent that decides with the deterministic engine
    pub fn new(config: AgentConfig, retriever: R) -> Result<Self, AgentError> {
        config.validate().map_err(AgentError::Config)?;
        Ok(Self {
            extractor: SignalExtractor::new(config.extractor.clone()),
            retriever,
            decider: None,
            gate: ReviewGate::new(config.gate.clone()),
            config,
        })
    }
}

impl<R, L> TriageAgent<R, L>
where
    R: CaseRetriever,
    R::Error: Display,
    L: LlmProvider,
    L::Error: Display,
{
    /// Attach a language model, used when the decision mode is `llm`
    pub fn with_llm<P>(self, provider: P) -> TriageAgent<R, P>
    where
        P: LlmProvider,
        P::Error: Display,
    {
        TriageAgent {
            extractor: self.extractor,
            retriever: self.retriever,
            decider: Some(LlmDecider::new(provider)),
            gate: self.gate,
            config: self.config,
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run one request through the pipeline
    ///
    /// Never fails: errors are reported in the envelope together with the
    /// steps recorded before the failure.
    pub async fn execute(&self, request: ExecuteRequest) -> ExecutionResponse {
        let mut steps = Vec::with_capacity(modules::ALL.len());
        match self.run(request, &mut steps).await {
            Ok((text, outcome)) => ExecutionResponse::ok(text, steps, outcome),
            Err(e) => {
                warn!("Triage run failed after {} steps: {}", steps.len(), e);
                ExecutionResponse::error(e.to_string(), steps)
            }
        }
    }

    async fn run(
        &self,
        request: ExecuteRequest,
        steps: &mut Vec<Step>,
    ) -> Result<(String, TriageOutcome), AgentError> {
        let (text, record) = resolve_request(request)?;
        let context = record.as_ref().map(complaint_context).unwrap_or_default();

        info!("Starting triage run, text length {}", text.len());

        // (1) Preprocessing
        let extraction = self.extractor.extract_with_context(&text, &context)?;
        let parsed = extraction.parsed;
        let draft = extraction.draft;
        push(
            steps,
            modules::PREPROCESSING,
            json!({ "input_prompt": text }),
            json!({ "extracted": parsed, "draft_decision": draft }),
        );

        // (2) Reason
        let reasoning = build_reasoning(&parsed);
        push(steps, modules::REASON, json!({ "parsed": parsed }), to_value(&reasoning));

        // (3) Act: retrieve similar cases
        let top_k = self.config.top_k;
        let retrieve_prompt = json!({ "parsed": parsed, "top_k": top_k });
        let retrieval = timeout(
            Duration::from_secs(self.config.retrieval_timeout_secs),
            self.retriever.retrieve(&parsed, top_k),
        )
        .await;
        let cases = match retrieval {
            Ok(Ok(cases)) => cases,
            Ok(Err(e)) => {
                push(steps, modules::RETRIEVE, retrieve_prompt, json!({ "error": e.to_string() }));
                return Err(AgentError::Retrieval(e.to_string()));
            }
            Err(_) => {
                let err = AgentError::RetrievalTimeout(self.config.retrieval_timeout_secs);
                push(steps, modules::RETRIEVE, retrieve_prompt, json!({ "error": err.to_string() }));
                return Err(err);
            }
        };
        push(steps, modules::RETRIEVE, retrieve_prompt, json!({ "cases": cases }));

        // (4) Observe
        let evidence = summarize_evidence(&cases);
        push(steps, modules::OBSERVE, json!({ "cases": cases }), to_value(&evidence));

        // (5) Decide
        let decide_prompt = json!({
            "parsed": parsed,
            "draft_decision": draft,
            "evidence": evidence,
            "mode": self.config.decision_mode,
        });
        let (decision, scored, source, llm_error) = match self.config.decision_mode {
            DecisionMode::Engine => {
                let scored = compute_decision(&parsed, &draft, Some(&evidence), &self.config.confidence);
                (scored.decision.clone(), Some(scored), DecisionSource::Engine, None)
            }
            DecisionMode::Llm => match self.decide_with_llm(&parsed, &evidence).await {
                Ok(decision) => (decision, None, DecisionSource::Llm, None),
                Err(message) => {
                    warn!("LLM decision failed, falling back to engine: {}", message);
                    let scored =
                        compute_decision(&parsed, &draft, Some(&evidence), &self.config.confidence);
                    (
                        scored.decision.clone(),
                        Some(scored),
                        DecisionSource::EngineFallback,
                        Some(message),
                    )
                }
            },
        };
        push(
            steps,
            modules::DECIDE,
            decide_prompt,
            decide_response(&decision, scored.as_ref(), source, llm_error.as_deref()),
        );
        debug!(
            "Decision: agency={}, urgency={}, confidence={:.2}, source={:?}",
            decision.agency, decision.urgency, decision.confidence, source
        );

        // (6) Confidence gating
        let verdict = self.gate.evaluate(&decision, &parsed);
        push(
            steps,
            modules::GATING,
            json!({
                "confidence": verdict.confidence,
                "threshold": verdict.threshold,
                "critical_missing": verdict.critical_missing,
            }),
            json!({ "passes": verdict.passes() }),
        );

        // (7) Human review escalation
        push(
            steps,
            modules::ESCALATION,
            json!({
                "confidence": verdict.confidence,
                "critical_missing": verdict.critical_missing,
            }),
            json!({
                "needs_human_review": verdict.needs_review,
                "reason": verdict.reason,
            }),
        );

        // (8) Response generator
        let user_text = format_user_response(&decision);
        push(
            steps,
            modules::RESPONSE,
            json!({ "decision": decision }),
            json!({ "text": user_text }),
        );

        info!(
            "Triage complete: agency={}, confidence={:.2}, needs_review={}",
            decision.agency, decision.confidence, verdict.needs_review
        );

        let outcome = TriageOutcome {
            complaint_id: record.and_then(|r| r.complaint_id),
            parsed,
            draft,
            reasoning,
            evidence,
            scored,
            decision,
            source,
            verdict,
        };
        Ok((user_text, outcome))
    }

    /// Ask the language model; any failure, including a timeout, is returned as text
    async fn decide_with_llm(
        &self,
        parsed: &ParsedComplaint,
        evidence: &EvidenceSummary,
    ) -> Result<Decision, String> {
        let decider = self
            .decider
            .as_ref()
            .ok_or_else(|| "no language model attached".to_string())?;

        let limit = self.config.llm_timeout_secs;
        match timeout(Duration::from_secs(limit), decider.decide(parsed, Some(evidence))).await {
            Ok(Ok(decision)) => Ok(decision),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}s", limit)),
        }
    }
}

/// Pick the complaint text: a record's text wins over the prompt
fn resolve_request(request: ExecuteRequest) -> Result<(String, Option<ComplaintRecord>), AgentError> {
    if let Some(record) = request.complaint {
        let text = record.complaint_text.trim().to_string();
        if !text.is_empty() {
            return Ok((text, Some(record)));
        }
    }
    match request.prompt.as_deref().map(str::trim) {
        Some(prompt) if !prompt.is_empty() => Ok((prompt.to_string(), None)),
        _ => Err(AgentError::EmptyRequest),
    }
}

/// Structured fields from a record; unparseable borough or time are ignored
fn complaint_context(record: &ComplaintRecord) -> ComplaintContext {
    let borough = record.borough.as_deref().and_then(|b| {
        let parsed = Borough::parse(b);
        if parsed.is_none() && !b.trim().is_empty() {
            warn!("Ignoring unrecognized borough '{}'", b);
        }
        parsed
    });
    let incident_time = record.incident_time.as_deref().and_then(|t| {
        let parsed = ClockTime::parse(t.trim());
        if parsed.is_none() && !t.trim().is_empty() {
            warn!("Ignoring unparseable incident time '{}'", t);
        }
        parsed
    });

    ComplaintContext {
        borough,
        location_details: record.location_details.clone(),
        incident_time,
    }
}

fn decide_response(
    decision: &Decision,
    scored: Option<&ScoredDecision>,
    source: DecisionSource,
    llm_error: Option<&str>,
) -> Value {
    let mut response = to_value(decision);
    if let Value::Object(map) = &mut response {
        map.insert("source".to_string(), to_value(&source));
        if let Some(scored) = scored {
            map.insert("fusion".to_string(), to_value(&scored.outcome));
            map.insert(
                "pre_evidence_confidence".to_string(),
                json!(scored.pre_evidence_confidence),
            );
        }
        if let Some(message) = llm_error {
            map.insert("llm_error".to_string(), json!(message));
        }
    }
    response
}

fn push(steps: &mut Vec<Step>, module: &str, prompt: Value, response: Value) {
    debug!("Step {}: {}", steps.len() + 1, module);
    steps.push(Step {
        module: module.to_string(),
        prompt,
        response,
    });
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
