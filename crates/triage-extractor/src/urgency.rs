//! Additive severity scoring

use crate::classifier::property_crime_in_progress;
use crate::patterns::{mask_fire_fixtures, HAZARDOUS, HIGH, RECURRING};
use triage_domain::{Category, ClockTime, Urgency};

/// Compute the raw severity score
///
/// Bonuses stack and the score is not capped:
/// - +3 life-threatening signal
/// - +2 hazardous signal
/// - +2 property crime in progress
/// - +1 noise at night (text says "night", or time in 22:00-05:00 inclusive)
/// - +1 recurring language
pub fn severity_score(text: &str, category: Category, time_24h: Option<ClockTime>) -> u32 {
    let lowered = text.to_lowercase();
    let masked = mask_fire_fixtures(text);
    let mut severity = 0;

    if HIGH.is_match(&masked) {
        severity += 3;
    }
    if HAZARDOUS.is_match(text) {
        severity += 2;
    }
    if property_crime_in_progress(text) {
        severity += 2;
    }
    if category == Category::Noise
        && (lowered.contains("night") || time_24h.is_some_and(|t| t.is_night()))
    {
        severity += 1;
    }
    if RECURRING.is_match(text) {
        severity += 1;
    }

    severity
}

/// Estimate the urgency level of a complaint
///
/// Vague complaints carry no severity points on their own, so they land at `low`.
pub fn estimate_urgency(text: &str, category: Category, time_24h: Option<ClockTime>) -> Urgency {
    Urgency::from_severity(severity_score(text, category, time_24h))
}
