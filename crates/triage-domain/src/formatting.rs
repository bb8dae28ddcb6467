//! Fixed-template rendering of a decision

use crate::Decision;

/// Render a decision as the five-line user-facing template
pub fn format_user_response(decision: &Decision) -> String {
    format!(
        "Decision:\n- Agency: {}\n- Urgency: {}\n- Action: {}\n- Justification: {}\n- Confidence: {}\n",
        decision.agency, decision.urgency, decision.action, decision.justification, decision.confidence
    )
}
