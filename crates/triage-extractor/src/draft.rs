//! Draft decision assembly

use crate::config::ExtractorConfig;
use triage_domain::{Category, DraftDecision, Urgency};

/// Combine the category mappings and estimated urgency into a draft
pub fn assemble_draft(category: Category, urgency: Urgency, config: &ExtractorConfig) -> DraftDecision {
    DraftDecision {
        agency_guess: category.agency().to_string(),
        urgency_guess: urgency,
        action_guess: category.action().to_string(),
        confidence_stub: config.seed_for(category.is_unknown()),
    }
}
