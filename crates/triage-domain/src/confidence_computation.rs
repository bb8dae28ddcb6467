//! Confidence computation module
//!
//! Implements the deterministic confidence policy that turns a draft decision
//! into a final, auditable `Decision`:
//! 1. Justification trace from extracted signals
//! 2. Penalties for missing category, location and time
//! 3. Hard caps for vague or location-less complaints
//! 4. Evidence fusion with retrieved historical cases
//!
//! The draft is never mutated. An evidence override produces a new agency in the
//! returned decision and is reported through [`FusionOutcome`].

use crate::{Category, Decision, DraftDecision, EvidenceSummary, ParsedComplaint, Urgency};
use serde::{Deserialize, Serialize};

/// Default minimum share of retrieved cases the top agency must hold
pub const AGENCY_VOTE_RATIO_THRESHOLD: f64 = 0.70;

/// Default minimum similarity of the best retrieved case
pub const SCORE_THRESHOLD: f64 = 0.62;

/// Penalty when the category is unknown
pub const UNKNOWN_CATEGORY_PENALTY: f64 = 0.15;

/// Penalty when no location-like field is present
pub const MISSING_LOCATION_PENALTY: f64 = 0.10;

/// Penalty when no incident time is present
pub const MISSING_TIME_PENALTY: f64 = 0.05;

/// Floor applied after penalties
pub const CONFIDENCE_FLOOR: f64 = 0.05;

/// Floor for high-urgency safety complaints, applied before the location penalty
pub const SAFETY_HIGH_FLOOR: f64 = 0.85;

/// Cap for complaints worded with hedging language
pub const VAGUE_CAP: f64 = 0.35;

/// Cap for complaints without any location
pub const NO_LOCATION_CAP: f64 = 0.40;

/// Hedging phrases that mark a complaint as vague (matched on lowercase text)
pub const VAGUE_PHRASES: [&str; 11] = [
    "weird",
    "strange",
    "not sure",
    "maybe",
    "something",
    "feels off",
    "smells funny",
    "i think",
    "might be",
    "kind of",
    "sort of",
];

/// Thresholds for evidence fusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Minimum vote ratio for evidence to count as strong
    pub agency_vote_ratio_threshold: f64,
    /// Minimum top similarity score for evidence to count as strong
    pub score_threshold: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            agency_vote_ratio_threshold: AGENCY_VOTE_RATIO_THRESHOLD,
            score_threshold: SCORE_THRESHOLD,
        }
    }
}

impl ConfidenceConfig {
    /// Validate that both thresholds lie in [0, 1]
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("agency_vote_ratio_threshold", self.agency_vote_ratio_threshold),
            ("score_threshold", self.score_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} is outside [0.0, 1.0]", name, value));
            }
        }
        Ok(())
    }
}

/// What evidence fusion did to the draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FusionOutcome {
    /// No evidence was supplied
    NoEvidence,
    /// Evidence named no agency or carried no score; confidence unchanged
    Inconclusive,
    /// Strong evidence agreed with the draft agency
    Confirmed,
    /// Strong evidence replaced the draft agency
    Overridden {
        /// Draft agency
        from: String,
        /// Agency the evidence voted for
        to: String,
    },
    /// Evidence was weak, or the complaint was vague or uncategorized
    Penalized,
}

/// Evidence statistics used during fusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceAssessment {
    /// Agency with the most votes
    pub top_agency: String,
    /// Share of retrieved cases held by the top agency
    pub vote_ratio: f64,
    /// Best similarity score
    pub top_score: Option<f64>,
    /// Whether both thresholds were met
    pub strong: bool,
}

/// Output of the confidence engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDecision {
    /// Final decision
    pub decision: Decision,
    /// Whether hedging language was detected
    pub is_vague: bool,
    /// Confidence after penalties and caps, before evidence fusion
    pub pre_evidence_confidence: f64,
    /// Evidence statistics, when evidence named a top agency
    pub evidence: Option<EvidenceAssessment>,
    /// Effect of evidence fusion
    pub outcome: FusionOutcome,
}

/// Whether the text contains hedging language
pub fn is_vague(text: &str) -> bool {
    let lowered = text.to_lowercase();
    VAGUE_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// Round to two decimal places
///
/// Rounds the exact binary value, with exact halves going to the even digit
/// (`0.125` → `0.12`, `0.375` → `0.38`).
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Compute the final decision for a complaint
///
/// # Arguments
/// * `parsed` - Extracted complaint signals
/// * `draft` - Preliminary decision; left untouched
/// * `evidence` - Summary of retrieved historical cases, if retrieval ran
/// * `config` - Evidence fusion thresholds
pub fn compute_decision(
    parsed: &ParsedComplaint,
    draft: &DraftDecision,
    evidence: Option<&EvidenceSummary>,
    config: &ConfidenceConfig,
) -> ScoredDecision {
    let mut justification = build_justification(parsed);
    let has_location = parsed.has_any_location();
    let vague = is_vague(&parsed.complaint_text);

    let confidence = apply_penalties(draft.confidence_stub, parsed, draft.urgency_guess, has_location);
    let confidence = apply_caps(confidence, vague, has_location);
    let pre_evidence_confidence = confidence;

    let mut agency = draft.agency_guess.clone();
    let (confidence, assessment, outcome) = match evidence {
        None => (confidence, None, FusionOutcome::NoEvidence),
        Some(summary) => {
            let fused = fuse_evidence(confidence, parsed.category, vague, &draft.agency_guess, summary, config);
            if let Some(assessment) = &fused.assessment {
                justification.push(format!("evidence_top_agency={}", assessment.top_agency));
                justification.push(format!("evidence_vote_ratio={:.2}", assessment.vote_ratio));
                if let Some(score) = assessment.top_score {
                    justification.push(format!("evidence_top_score={:.2}", score));
                }
            }
            if let FusionOutcome::Overridden { to, .. } = &fused.outcome {
                agency = to.clone();
            }
            (fused.confidence, fused.assessment, fused.outcome)
        }
    };

    // Caps bound the final value too, so strong evidence cannot lift a
    // location-less complaint past the no-location cap.
    let confidence = apply_caps(confidence, vague, has_location);
    let confidence = round2(confidence).clamp(0.0, 1.0);

    ScoredDecision {
        decision: Decision {
            agency,
            urgency: draft.urgency_guess,
            action: draft.action_guess.clone(),
            justification: justification.join(", "),
            confidence,
        },
        is_vague: vague,
        pre_evidence_confidence,
        evidence: assessment,
        outcome,
    }
}

/// Step 1: ordered trace of the signals the decision used
fn build_justification(parsed: &ParsedComplaint) -> Vec<String> {
    let mut parts = Vec::with_capacity(7);
    if let Some(time) = parsed.time_24h {
        parts.push(format!("time={}", time));
    }
    if let Some(recurrence) = parsed.recurrence.as_deref().filter(|r| !r.is_empty()) {
        parts.push(format!("recurrence={}", recurrence));
    }
    if let Some(location) = parsed.any_location() {
        parts.push(format!("location={}", location));
    }
    parts.push(format!("category={}", parsed.category));
    parts
}

/// Step 2: penalties for missing signals
fn apply_penalties(seed: f64, parsed: &ParsedComplaint, urgency: Urgency, has_location: bool) -> f64 {
    let mut confidence = seed;

    if parsed.category.is_unknown() {
        confidence -= UNKNOWN_CATEGORY_PENALTY;
    }

    if parsed.category == Category::Safety && urgency == Urgency::High {
        confidence = confidence.max(SAFETY_HIGH_FLOOR);
    }

    if !has_location {
        confidence -= MISSING_LOCATION_PENALTY;
    }

    if parsed.time_24h.is_none() {
        confidence -= MISSING_TIME_PENALTY;
    }

    confidence.max(CONFIDENCE_FLOOR)
}

/// Step 3: hard caps; these only ever lower confidence
fn apply_caps(confidence: f64, vague: bool, has_location: bool) -> f64 {
    let mut confidence = confidence;
    if vague {
        confidence = confidence.min(VAGUE_CAP);
    }
    if !has_location {
        confidence = confidence.min(NO_LOCATION_CAP);
    }
    confidence
}

struct Fusion {
    confidence: f64,
    assessment: Option<EvidenceAssessment>,
    outcome: FusionOutcome,
}

/// Step 4: merge retrieved evidence with the local judgment
fn fuse_evidence(
    confidence: f64,
    category: Category,
    vague: bool,
    draft_agency: &str,
    summary: &EvidenceSummary,
    config: &ConfidenceConfig,
) -> Fusion {
    let Some((top_agency, _)) = summary.agency_counts.top() else {
        return Fusion {
            confidence,
            assessment: None,
            outcome: FusionOutcome::Inconclusive,
        };
    };

    let vote_ratio = summary.vote_ratio();
    let strong = summary.top_score.is_some_and(|score| {
        vote_ratio >= config.agency_vote_ratio_threshold && score >= config.score_threshold
    });
    let assessment = EvidenceAssessment {
        top_agency: top_agency.to_string(),
        vote_ratio,
        top_score: summary.top_score,
        strong,
    };

    if summary.top_score.is_none() {
        return Fusion {
            confidence,
            assessment: Some(assessment),
            outcome: FusionOutcome::Inconclusive,
        };
    }

    let (confidence, outcome) = if strong && !vague && !category.is_unknown() {
        if top_agency != draft_agency {
            (
                (confidence.max(0.60) + 0.10).min(0.80),
                FusionOutcome::Overridden {
                    from: draft_agency.to_string(),
                    to: top_agency.to_string(),
                },
            )
        } else {
            ((confidence + 0.05).min(0.75), FusionOutcome::Confirmed)
        }
    } else {
        ((confidence - 0.05).max(0.20), FusionOutcome::Penalized)
    };

    Fusion {
        confidence,
        assessment: Some(assessment),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{summarize_evidence, CaseMetadata, CaseRecord, ClockTime};

    fn located_complaint(text: &str, category: Category) -> ParsedComplaint {
        let mut parsed = ParsedComplaint::new(text, category);
        parsed.location = Some("Brooklyn".to_string());
        parsed.time_24h = ClockTime::new(2, 0);
        parsed
    }

    fn draft(category: Category, urgency: Urgency, stub: f64) -> DraftDecision {
        DraftDecision {
            agency_guess: category.agency().to_string(),
            urgency_guess: urgency,
            action_guess: category.action().to_string(),
            confidence_stub: stub,
        }
    }

    fn evidence(agencies: &[&str], score: f64) -> EvidenceSummary {
        let cases: Vec<CaseRecord> = agencies
            .iter()
            .enumerate()
            .map(|(i, agency)| CaseRecord {
                id: format!("case-{}", i),
                score: Some(score - i as f64 * 0.01),
                metadata: CaseMetadata {
                    agency: Some(agency.to_string()),
                    ..Default::default()
                },
            })
            .collect();
        summarize_evidence(&cases)
    }

    #[test]
    fn test_justification_order() {
        let mut parsed = located_complaint("loud party", Category::Noise);
        parsed.recurrence = Some("every weekend".to_string());
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Medium, 0.7), None, &ConfidenceConfig::default());

        assert_eq!(
            result.decision.justification,
            "time=02:00, recurrence=every weekend, location=Brooklyn, category=noise"
        );
        assert_eq!(result.outcome, FusionOutcome::NoEvidence);
    }

    #[test]
    fn test_location_details_used_in_trace() {
        let mut parsed = ParsedComplaint::new("rats everywhere", Category::Sanitation);
        parsed.location_details = Some("behind 12 Elm St".to_string());
        let result = compute_decision(&parsed, &draft(Category::Sanitation, Urgency::Low, 0.7), None, &ConfidenceConfig::default());

        assert_eq!(result.decision.justification, "location=behind 12 Elm St, category=sanitation");
        // only the missing-time penalty applies
        assert_eq!(result.decision.confidence, 0.65);
    }

    #[test]
    fn test_all_penalties_apply() {
        let parsed = ParsedComplaint::new("hello", Category::Unknown);
        let result = compute_decision(&parsed, &draft(Category::Unknown, Urgency::Low, 0.35), None, &ConfidenceConfig::default());

        // 0.35 - 0.15 - 0.10 - 0.05 = 0.05
        assert_eq!(result.decision.confidence, 0.05);
        assert_eq!(result.decision.agency, "311 Triage (Unknown)");
    }

    #[test]
    fn test_vague_cap() {
        let parsed = located_complaint("not sure but something is weird", Category::Noise);
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Low, 0.9), None, &ConfidenceConfig::default());

        assert!(result.is_vague);
        assert_eq!(result.decision.confidence, 0.35);
    }

    #[test]
    fn test_safety_high_floor() {
        let parsed = located_complaint("shots fired", Category::Safety);
        let result = compute_decision(&parsed, &draft(Category::Safety, Urgency::High, 0.7), None, &ConfidenceConfig::default());

        assert_eq!(result.pre_evidence_confidence, 0.85);
        assert_eq!(result.decision.confidence, 0.85);
    }

    #[test]
    fn test_safety_high_floor_lowered_by_no_location_cap() {
        let mut parsed = ParsedComplaint::new("shots fired", Category::Safety);
        parsed.time_24h = ClockTime::new(23, 0);
        let result = compute_decision(&parsed, &draft(Category::Safety, Urgency::High, 0.7), None, &ConfidenceConfig::default());

        // floor 0.85, then -0.10 for location, then capped at 0.40
        assert_eq!(result.decision.confidence, 0.40);
    }

    #[test]
    fn test_safety_high_floor_lowered_by_vague_cap() {
        let parsed = located_complaint("i think there was a shooting", Category::Safety);
        let result = compute_decision(&parsed, &draft(Category::Safety, Urgency::High, 0.7), None, &ConfidenceConfig::default());

        assert_eq!(result.decision.confidence, 0.35);
    }

    #[test]
    fn test_strong_agreeing_evidence_confirms() {
        let parsed = located_complaint("loud party", Category::Noise);
        let agency = Category::Noise.agency();
        let summary = evidence(&[agency, agency, agency], 0.62);
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Medium, 0.7), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.outcome, FusionOutcome::Confirmed);
        assert_eq!(result.decision.confidence, 0.75);
        assert_eq!(result.decision.agency, agency);
        assert!(result.decision.justification.ends_with(&format!(
            "evidence_top_agency={}, evidence_vote_ratio=1.00, evidence_top_score=0.62",
            agency
        )));
    }

    #[test]
    fn test_strong_disagreeing_evidence_overrides() {
        let parsed = located_complaint("car blocking my driveway", Category::Parking);
        let original = draft(Category::Parking, Urgency::Low, 0.4);
        let summary = evidence(&["NYPD", "NYPD", "NYPD", "DOT"], 0.80);
        let result = compute_decision(&parsed, &original, Some(&summary), &ConfidenceConfig::default());

        assert_eq!(
            result.outcome,
            FusionOutcome::Overridden {
                from: "Parking Enforcement".to_string(),
                to: "NYPD".to_string()
            }
        );
        assert_eq!(result.decision.agency, "NYPD");
        // max(0.40, 0.60) + 0.10
        assert_eq!(result.decision.confidence, 0.70);
        // draft is untouched
        assert_eq!(original.agency_guess, "Parking Enforcement");
    }

    #[test]
    fn test_override_capped_at_080() {
        let parsed = located_complaint("car blocking my driveway", Category::Parking);
        let summary = evidence(&["NYPD", "NYPD"], 0.9);
        let result = compute_decision(&parsed, &draft(Category::Parking, Urgency::Low, 0.95), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.decision.confidence, 0.80);
    }

    #[test]
    fn test_weak_evidence_penalizes() {
        let parsed = located_complaint("loud party", Category::Noise);
        let summary = evidence(&["NYPD", "DEP", "DOT"], 0.9);
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Medium, 0.7), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.outcome, FusionOutcome::Penalized);
        assert_eq!(result.decision.confidence, 0.65);
        assert_eq!(result.decision.agency, Category::Noise.agency());
    }

    #[test]
    fn test_penalty_floor_020() {
        let parsed = ParsedComplaint::new("hmm", Category::Unknown);
        let summary = evidence(&["NYPD"], 0.9);
        let result = compute_decision(&parsed, &draft(Category::Unknown, Urgency::Low, 0.35), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.outcome, FusionOutcome::Penalized);
        assert_eq!(result.decision.confidence, 0.20);
    }

    #[test]
    fn test_vague_complaint_never_boosted() {
        let parsed = located_complaint("maybe a leak, not sure", Category::Water);
        let agency = Category::Water.agency();
        let summary = evidence(&[agency, agency], 0.99);
        let result = compute_decision(&parsed, &draft(Category::Water, Urgency::Low, 0.7), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.outcome, FusionOutcome::Penalized);
        assert_eq!(result.decision.confidence, 0.30);
    }

    #[test]
    fn test_no_location_cap_holds_after_confirmation() {
        let mut parsed = ParsedComplaint::new("loud music", Category::Noise);
        parsed.time_24h = ClockTime::new(23, 30);
        let agency = Category::Noise.agency();
        let summary = evidence(&[agency, agency], 0.9);
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Medium, 0.7), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.outcome, FusionOutcome::Confirmed);
        assert_eq!(result.decision.confidence, 0.40);
    }

    #[test]
    fn test_evidence_without_agencies_is_inconclusive() {
        let parsed = located_complaint("loud party", Category::Noise);
        let summary = summarize_evidence(&[CaseRecord {
            id: "x".to_string(),
            score: Some(0.9),
            metadata: CaseMetadata::default(),
        }]);
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Medium, 0.7), Some(&summary), &ConfidenceConfig::default());

        assert_eq!(result.outcome, FusionOutcome::Inconclusive);
        assert_eq!(result.decision.confidence, 0.70);
        assert!(!result.decision.justification.contains("evidence_"));
    }

    #[test]
    fn test_custom_thresholds() {
        let parsed = located_complaint("loud party", Category::Noise);
        let agency = Category::Noise.agency();
        let summary = evidence(&[agency, agency, "NYPD"], 0.5);
        let config = ConfidenceConfig {
            agency_vote_ratio_threshold: 0.6,
            score_threshold: 0.5,
        };
        let result = compute_decision(&parsed, &draft(Category::Noise, Urgency::Medium, 0.7), Some(&summary), &config);

        assert_eq!(result.outcome, FusionOutcome::Confirmed);
    }

    #[test]
    fn test_config_validation() {
        assert!(ConfidenceConfig::default().validate().is_ok());
        let config = ConfidenceConfig {
            agency_vote_ratio_threshold: 1.5,
            score_threshold: 0.6,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.55 + 0.05), 0.6);
        assert_eq!(round2(0.123), 0.12);
        assert_eq!(round2(0.125_000_1), 0.13);
    }

    #[test]
    fn test_round2_exact_halves_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.625), 0.62);
        // 0.135 is stored slightly above the half
        assert_eq!(round2(0.135), 0.14);
        assert_eq!(round2(1.0), 1.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_category() -> impl Strategy<Value = Category> {
            prop_oneof![
                Just(Category::Noise),
                Just(Category::Sanitation),
                Just(Category::Parking),
                Just(Category::Street),
                Just(Category::Water),
                Just(Category::Safety),
                Just(Category::Unknown),
            ]
        }

        fn any_urgency() -> impl Strategy<Value = Urgency> {
            prop_oneof![Just(Urgency::Low), Just(Urgency::Medium), Just(Urgency::High)]
        }

        prop_compose! {
            fn any_case()(
                category in any_category(),
                urgency in any_urgency(),
                stub in 0.0f64..=1.0,
                has_location in any::<bool>(),
                has_time in any::<bool>(),
                vague in any::<bool>(),
            ) -> (ParsedComplaint, DraftDecision) {
                let text = if vague { "not sure what happened" } else { "plain report" };
                let mut parsed = ParsedComplaint::new(text, category);
                if has_location {
                    parsed.location = Some("Queens".to_string());
                }
                if has_time {
                    parsed.time_24h = ClockTime::new(12, 0);
                }
                (parsed, draft(category, urgency, stub))
            }
        }

        prop_compose! {
            fn any_evidence()(
                picks in proptest::collection::vec(0usize..3, 0..6),
                score in 0.0f64..=1.0,
            ) -> EvidenceSummary {
                let names = ["NYPD", "DSNY", "Noise Control / Non-emergency Police"];
                let agencies: Vec<&str> = picks.iter().map(|i| names[*i]).collect();
                evidence(&agencies, score)
            }
        }

        proptest! {
            #[test]
            fn confidence_always_in_bounds((parsed, draft) in any_case(), summary in proptest::option::of(any_evidence())) {
                let result = compute_decision(&parsed, &draft, summary.as_ref(), &ConfidenceConfig::default());
                prop_assert!(result.decision.confidence >= 0.0);
                prop_assert!(result.decision.confidence <= 1.0);
                prop_assert!(result.pre_evidence_confidence >= CONFIDENCE_FLOOR);
            }

            #[test]
            fn engine_is_idempotent((parsed, draft) in any_case(), summary in proptest::option::of(any_evidence())) {
                let first = compute_decision(&parsed, &draft, summary.as_ref(), &ConfidenceConfig::default());
                let second = compute_decision(&parsed, &draft, summary.as_ref(), &ConfidenceConfig::default());
                prop_assert_eq!(first, second);
            }

            #[test]
            fn vague_complaints_stay_capped((parsed, draft) in any_case(), summary in proptest::option::of(any_evidence())) {
                let result = compute_decision(&parsed, &draft, summary.as_ref(), &ConfidenceConfig::default());
                if result.is_vague {
                    prop_assert!(result.decision.confidence <= VAGUE_CAP);
                }
                if !parsed.has_any_location() {
                    prop_assert!(result.decision.confidence <= NO_LOCATION_CAP);
                }
            }
        }
    }
}
