//! Layered category classifier
//!
//! Precedence, first match wins:
//! 1. Vague wording with no explicit hazard → `unknown`
//! 2. Explicit hazard, public-safety language, or a property crime in progress → `safety`
//! 3. Whole-word keyword scoring; ties go to the category listed first, zero hits → `unknown`

use crate::patterns::{
    mask_fire_fixtures, BREAK_OR_TAMPER, DOOR, HANDLE, HAZARD, KEYWORD_PATTERNS, PUBLIC_SAFETY,
    TRYING, VAGUE_ONLY, VEHICLE,
};
use triage_domain::Category;

/// Someone working a door handle, or breaking into or tampering with a vehicle
pub fn property_crime_in_progress(text: &str) -> bool {
    let door_attempt = DOOR.is_match(text) && HANDLE.is_match(text) && TRYING.is_match(text);
    let vehicle_attempt = VEHICLE.is_match(text) && BREAK_OR_TAMPER.is_match(text);
    door_attempt || vehicle_attempt
}

pub(crate) fn has_explicit_hazard(text: &str) -> bool {
    HAZARD.is_match(&mask_fire_fixtures(text))
}

/// Classify complaint text into a category
pub fn classify_category(text: &str) -> Category {
    let hazard = has_explicit_hazard(text);

    if VAGUE_ONLY.is_match(text) && !hazard {
        return Category::Unknown;
    }

    if hazard || PUBLIC_SAFETY.is_match(text) || property_crime_in_progress(text) {
        return Category::Safety;
    }

    let mut best = Category::Unknown;
    let mut best_score = 0;
    for (category, keywords) in KEYWORD_PATTERNS.iter() {
        let score = keywords.iter().filter(|re| re.is_match(text)).count();
        if score > best_score {
            best = *category;
            best_score = score;
        }
    }
    best
}
