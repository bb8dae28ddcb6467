//! Compiled phrase and signal patterns
//!
//! Every phrase list compiles to a single case-insensitive, whole-word
//! alternation. Spaces inside a phrase match any run of whitespace.

use lazy_static::lazy_static;
use regex::Regex;
use triage_domain::{Borough, Category};

/// Compile a phrase list into one whole-word alternation
pub(crate) fn phrase_set(phrases: &[&str]) -> Regex {
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("phrase list compiles")
}

/// Per-category keywords, in tie-break order
const CATEGORY_KEYWORDS: [(Category, &[&str]); 6] = [
    (Category::Noise, &["loud", "noise", "noisy", "party", "music", "shouting", "barking"]),
    (Category::Sanitation, &["trash", "garbage", "rats", "rodents", "smell", "dumping", "litter"]),
    (Category::Parking, &["blocked", "parking", "parked", "car", "vehicle", "double parked", "tow", "driveway"]),
    (Category::Street, &["pothole", "streetlight", "street light", "traffic light", "sidewalk", "road"]),
    (Category::Water, &["leak", "leaking", "water", "sewer", "flood", "flooding", "hydrant"]),
    (Category::Safety, &["gun", "violence", "assault", "threat", "fight"]),
];

/// Vague wording the classifier holds at `unknown` when no hazard is present
pub(crate) const VAGUE_ONLY_PHRASES: &[&str] = &[
    "not sure", "feels off", "weird", "strange", "something off", "smells funny", "no idea",
];

/// Explicit physical hazards
pub(crate) const HAZARD_PHRASES: &[&str] = &[
    "gas leak", "smell of gas", "smells like gas", "smoke", "fire", "carbon monoxide",
    "explosion", "sparking", "live wire",
];

/// Public-safety and crime language
pub(crate) const PUBLIC_SAFETY_PHRASES: &[&str] = &[
    "suspicious", "weapon", "shots fired", "gun", "knife", "shooting", "stabbed", "assault",
    "robbery", "break-in", "breaking in", "threatening",
];

/// Life-threatening signals (+3 severity)
pub(crate) const HIGH_SIGNALS: &[&str] = &[
    "gas leak", "shooting", "shots fired", "stabbed", "stabbing", "not breathing", "unconscious",
    "fire", "explosion", "carbon monoxide",
];

/// Hazardous but non-lethal signals (+2 severity)
pub(crate) const HAZARD_SIGNALS: &[&str] = &[
    "fumes", "dizzy", "weapon", "fight", "fighting", "blocking traffic", "smoke", "threat",
    "threatening", "flooding", "sparking", "live wire",
];

/// Recurring language (+1 severity)
pub(crate) const RECURRING_SIGNALS: &[&str] = &["every", "again", "recurring", "daily", "constantly"];

/// Recurrence phrases, in priority order
pub(crate) const RECURRENCE_PHRASES: [&str; 7] = [
    "every day",
    "daily",
    "every weekend",
    "every week",
    "every night",
    "again",
    "recurring",
];

lazy_static! {
    /// 12-hour clock: "2am", "2 am", "2:15pm"
    pub(crate) static ref TIME_12H: Regex =
        Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("12h pattern compiles");

    /// 24-hour clock: "14:30", "7:05"
    pub(crate) static ref TIME_24H: Regex =
        Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("24h pattern compiles");

    /// Capitalized place name after "in"
    pub(crate) static ref IN_PLACE: Regex =
        Regex::new(r"\bin\s+([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)\b").expect("place pattern compiles");

    /// One pattern per borough, in lookup order
    pub(crate) static ref BOROUGH_PATTERNS: Vec<(Borough, Regex)> = Borough::ALL
        .into_iter()
        .map(|b| (b, phrase_set(&[b.display_name().to_lowercase().as_str()])))
        .collect();

    /// Recurrence patterns paired with the phrase they report
    pub(crate) static ref RECURRENCE_PATTERNS: Vec<(&'static str, Regex)> = RECURRENCE_PHRASES
        .into_iter()
        .map(|p| (p, phrase_set(&[p])))
        .collect();

    /// Keyword patterns per category; each keyword counts at most once
    pub(crate) static ref KEYWORD_PATTERNS: Vec<(Category, Vec<Regex>)> = CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| (*category, keywords.iter().map(|k| phrase_set(&[*k])).collect()))
        .collect();

    /// "fire hydrant" and "fire escape" are fixtures, not fires
    pub(crate) static ref FIRE_FIXTURES: Regex =
        Regex::new(r"(?i)\bfire\s+(?:hydrants?|escapes?)\b").expect("fixture pattern compiles");

    pub(crate) static ref VAGUE_ONLY: Regex = phrase_set(VAGUE_ONLY_PHRASES);
    pub(crate) static ref HAZARD: Regex = phrase_set(HAZARD_PHRASES);
    pub(crate) static ref PUBLIC_SAFETY: Regex = phrase_set(PUBLIC_SAFETY_PHRASES);
    pub(crate) static ref HIGH: Regex = phrase_set(HIGH_SIGNALS);
    pub(crate) static ref HAZARDOUS: Regex = phrase_set(HAZARD_SIGNALS);
    pub(crate) static ref RECURRING: Regex = phrase_set(RECURRING_SIGNALS);

    // Property crime in progress
    pub(crate) static ref DOOR: Regex = phrase_set(&["door", "doors"]);
    pub(crate) static ref HANDLE: Regex = phrase_set(&["handle", "handles", "doorknob"]);
    pub(crate) static ref TRYING: Regex = phrase_set(&["trying", "tried", "try", "jiggling"]);
    pub(crate) static ref VEHICLE: Regex = phrase_set(&["car", "cars", "vehicle", "vehicles"]);
    pub(crate) static ref BREAK_OR_TAMPER: Regex =
        phrase_set(&["break", "breaking", "tamper", "tampering", "tampered"]);
}

/// Text with fire fixtures masked out, for hazard matching
pub(crate) fn mask_fire_fixtures(text: &str) -> std::borrow::Cow<'_, str> {
    FIRE_FIXTURES.replace_all(text, "")
}
