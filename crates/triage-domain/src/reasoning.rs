//! Informational reasoning note derived from extracted signals

use crate::ParsedComplaint;
use serde::{Deserialize, Serialize};

/// Missing-info label for an absent location
pub const MISSING_LOCATION: &str = "exact location/address";

/// Missing-info label for an absent incident time
pub const MISSING_TIME: &str = "time of incident";

/// Constraint tag for recurring complaints
pub const RECURRING_CONSTRAINT: &str = "recurring issue";

/// What the triage is trying to do and what it lacks
///
/// Does not feed back into confidence scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningNote {
    /// Templated intent sentence
    pub intent: String,
    /// Short constraint tags
    pub constraints: Vec<String>,
    /// Human-readable names of absent critical fields
    pub missing_info: Vec<String>,
}

/// Build the reasoning note for a complaint
pub fn build_reasoning(parsed: &ParsedComplaint) -> ReasoningNote {
    let mut missing_info = Vec::new();
    if parsed.location.as_deref().map_or(true, |l| l.trim().is_empty()) {
        missing_info.push(MISSING_LOCATION.to_string());
    }
    if parsed.time_24h.is_none() {
        missing_info.push(MISSING_TIME.to_string());
    }

    let mut constraints = Vec::new();
    if parsed.recurrence.as_deref().is_some_and(|r| !r.is_empty()) {
        constraints.push(RECURRING_CONSTRAINT.to_string());
    }

    ReasoningNote {
        intent: format!("Handle a {} complaint", parsed.category),
        constraints,
        missing_info,
    }
}
