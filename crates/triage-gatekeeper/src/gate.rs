//! Review gating logic

use crate::{GateConfig, GatekeeperError};
use serde::{Deserialize, Serialize};
use std::fmt;
use triage_domain::{Decision, ParsedComplaint};

/// Information without which a decision cannot be dispatched automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticalField {
    /// Category is unknown
    Category,
    /// No location-like field present
    Location,
}

impl CriticalField {
    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalField::Category => "category",
            CriticalField::Location => "location",
        }
    }
}

impl fmt::Display for CriticalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a decision was (or was not) routed to review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    /// Confidence below threshold or critical information missing
    LowConfidenceOrMissingInfo,
    /// No review needed
    None,
}

impl ReviewReason {
    /// Get the reason as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewReason::LowConfidenceOrMissingInfo => "low_confidence_or_missing_info",
            ReviewReason::None => "none",
        }
    }
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the review gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    /// Confidence the gate evaluated
    pub confidence: f64,

    /// Threshold the gate applied
    pub threshold: f64,

    /// Critical fields that are missing
    pub critical_missing: Vec<CriticalField>,

    /// Whether a human must confirm the decision
    pub needs_review: bool,

    /// Reason code
    pub reason: ReviewReason,
}

impl ReviewVerdict {
    /// Whether the decision may be dispatched without review
    pub fn passes(&self) -> bool {
        !self.needs_review
    }
}

/// The ReviewGate decides whether a decision needs human confirmation
#[derive(Debug, Clone, Default)]
pub struct ReviewGate {
    config: GateConfig,
}

impl ReviewGate {
    /// Create a new ReviewGate with the given configuration
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Create a ReviewGate after validating the configuration
    pub fn try_new(config: GateConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self::new(config))
    }

    /// Get the active configuration
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate a decision against the complaint it was made for
    pub fn evaluate(&self, decision: &Decision, parsed: &ParsedComplaint) -> ReviewVerdict {
        let mut critical_missing = Vec::new();
        if self.config.require_category && parsed.category.is_unknown() {
            critical_missing.push(CriticalField::Category);
        }
        if self.config.require_location && !parsed.has_any_location() {
            critical_missing.push(CriticalField::Location);
        }

        let needs_review =
            decision.confidence < self.config.review_threshold || !critical_missing.is_empty();

        ReviewVerdict {
            confidence: decision.confidence,
            threshold: self.config.review_threshold,
            critical_missing,
            needs_review,
            reason: if needs_review {
                ReviewReason::LowConfidenceOrMissingInfo
            } else {
                ReviewReason::None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_domain::{Category, Urgency};

    fn decision(confidence: f64) -> Decision {
        Decision {
            agency: Category::Noise.agency().to_string(),
            urgency: Urgency::Medium,
            action: Category::Noise.action().to_string(),
            justification: "category=noise".to_string(),
            confidence,
        }
    }

    fn located(category: Category) -> ParsedComplaint {
        let mut parsed = ParsedComplaint::new("text", category);
        parsed.location = Some("Brooklyn".to_string());
        parsed
    }

    #[test]
    fn test_confident_and_complete_passes() {
        let verdict = ReviewGate::default().evaluate(&decision(0.75), &located(Category::Noise));
        assert!(verdict.passes());
        assert!(verdict.critical_missing.is_empty());
        assert_eq!(verdict.reason, ReviewReason::None);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let gate = ReviewGate::default();
        assert!(!gate.evaluate(&decision(0.6), &located(Category::Noise)).needs_review);
        assert!(gate.evaluate(&decision(0.59), &located(Category::Noise)).needs_review);
    }

    #[test]
    fn test_unknown_category_is_critical() {
        let verdict = ReviewGate::default().evaluate(&decision(0.9), &located(Category::Unknown));
        assert!(verdict.needs_review);
        assert_eq!(verdict.critical_missing, vec![CriticalField::Category]);
        assert_eq!(verdict.reason, ReviewReason::LowConfidenceOrMissingInfo);
    }

    #[test]
    fn test_missing_location_is_critical() {
        let parsed = ParsedComplaint::new("text", Category::Unknown);
        let verdict = ReviewGate::default().evaluate(&decision(0.9), &parsed);
        assert_eq!(
            verdict.critical_missing,
            vec![CriticalField::Category, CriticalField::Location]
        );
    }

    #[test]
    fn test_location_details_count_as_location() {
        let mut parsed = ParsedComplaint::new("text", Category::Water);
        parsed.location_details = Some("basement of 40 Main St".to_string());
        let verdict = ReviewGate::default().evaluate(&decision(0.8), &parsed);
        assert!(verdict.passes());
    }

    #[test]
    fn test_permissive_ignores_missing_fields() {
        let gate = ReviewGate::new(GateConfig::permissive());
        let parsed = ParsedComplaint::new("text", Category::Unknown);
        assert!(gate.evaluate(&decision(0.5), &parsed).passes());
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = GateConfig {
            review_threshold: -0.1,
            ..GateConfig::default()
        };
        assert!(matches!(ReviewGate::try_new(config), Err(GatekeeperError::Config(_))));
    }

    #[test]
    fn test_verdict_serialization() {
        let parsed = ParsedComplaint::new("text", Category::Noise);
        let verdict = ReviewGate::default().evaluate(&decision(0.9), &parsed);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["critical_missing"][0], "location");
        assert_eq!(json["reason"], "low_confidence_or_missing_info");
    }
}
