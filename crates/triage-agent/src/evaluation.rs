//! Routing accuracy over labelled complaints

use crate::agent::TriageAgent;
use crate::error::AgentError;
use crate::types::ExecuteRequest;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, info};
use triage_domain::traits::{CaseRetriever, LlmProvider};

/// A complaint with the agency that actually handled it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSample {
    /// Complaint text
    pub complaint_text: String,
    /// Agency label
    pub agency: String,
}

impl RoutingSample {
    /// Parse one sample per non-blank line
    pub fn parse_jsonl(input: &str) -> Result<Vec<Self>, AgentError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|source| AgentError::Sample { line: i + 1, source })
            })
            .collect()
    }
}

/// A sample whose decision named a different agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingMismatch {
    /// Complaint text
    pub complaint_text: String,
    /// Labelled agency
    pub expected: String,
    /// Decided agency, or `None` when the run failed
    pub actual: Option<String>,
}

/// Aggregate routing accuracy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Samples run through the agent
    pub evaluated: usize,
    /// Samples whose decided agency matched the label
    pub matched: usize,
    /// Samples skipped for blank text or label
    pub skipped: usize,
    /// Runs that ended in an error envelope
    pub failed: usize,
    /// `matched / evaluated`, 0 when nothing was evaluated
    pub match_rate: f64,
    /// Samples that did not match
    pub mismatches: Vec<RoutingMismatch>,
}

/// Run labelled samples through the agent and compare decided agencies
///
/// Agencies are compared trimmed and case-insensitively.
pub async fn evaluate_routing<R, L>(agent: &TriageAgent<R, L>, samples: &[RoutingSample]) -> EvaluationReport
where
    R: CaseRetriever,
    R::Error: Display,
    L: LlmProvider,
    L::Error: Display,
{
    let mut report = EvaluationReport::default();

    for sample in samples {
        let expected = sample.agency.trim();
        if sample.complaint_text.trim().is_empty() || expected.is_empty() {
            report.skipped += 1;
            continue;
        }

        report.evaluated += 1;
        let response = agent
            .execute(ExecuteRequest::prompt(sample.complaint_text.as_str()))
            .await;
        let actual = response.outcome.map(|o| o.decision.agency);
        if actual.is_none() {
            report.failed += 1;
        }

        if actual
            .as_deref()
            .is_some_and(|a| a.trim().eq_ignore_ascii_case(expected))
        {
            report.matched += 1;
        } else {
            debug!("Mismatch: expected {}, got {:?}", expected, actual);
            report.mismatches.push(RoutingMismatch {
                complaint_text: sample.complaint_text.clone(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    if report.evaluated > 0 {
        report.match_rate = report.matched as f64 / report.evaluated as f64;
    }
    info!(
        "Routing evaluation: {}/{} matched ({:.1}%), {} skipped, {} failed",
        report.matched,
        report.evaluated,
        report.match_rate * 100.0,
        report.skipped,
        report.failed
    );
    report
}
