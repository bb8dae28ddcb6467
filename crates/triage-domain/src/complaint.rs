//! Structured view of a single complaint

use crate::{Borough, Category, ClockTime};
use serde::{Deserialize, Serialize};

/// Signals extracted from a complaint, plus the raw text they came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedComplaint {
    /// Classified category
    pub category: Category,

    /// Free-text location found in the complaint text
    pub location: Option<String>,

    /// Location details supplied separately (e.g., a form field)
    #[serde(default)]
    pub location_details: Option<String>,

    /// Borough, when one is known
    pub borough: Option<Borough>,

    /// Incident time
    pub time_24h: Option<ClockTime>,

    /// Recurrence phrase ("every weekend", "again", ...)
    pub recurrence: Option<String>,

    /// Raw complaint text
    pub complaint_text: String,
}

impl ParsedComplaint {
    /// Create a complaint with only text and category; every other signal absent
    pub fn new(complaint_text: impl Into<String>, category: Category) -> Self {
        Self {
            category,
            location: None,
            location_details: None,
            borough: None,
            time_24h: None,
            recurrence: None,
            complaint_text: complaint_text.into(),
        }
    }

    /// The first non-blank location-like field (`location`, then `location_details`)
    pub fn any_location(&self) -> Option<&str> {
        [self.location.as_deref(), self.location_details.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Whether any location-like field is present
    pub fn has_any_location(&self) -> bool {
        self.any_location().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_location_prefers_location() {
        let mut parsed = ParsedComplaint::new("text", Category::Noise);
        parsed.location = Some("Brooklyn".to_string());
        parsed.location_details = Some("5th floor".to_string());
        assert_eq!(parsed.any_location(), Some("Brooklyn"));
    }

    #[test]
    fn test_blank_location_falls_back_to_details() {
        let mut parsed = ParsedComplaint::new("text", Category::Noise);
        parsed.location = Some("   ".to_string());
        parsed.location_details = Some("corner of 5th and Main".to_string());
        assert_eq!(parsed.any_location(), Some("corner of 5th and Main"));
    }

    #[test]
    fn test_no_location() {
        let mut parsed = ParsedComplaint::new("text", Category::Noise);
        parsed.location_details = Some(String::new());
        assert!(!parsed.has_any_location());
    }
}
