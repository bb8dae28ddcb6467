//! Preliminary and final dispatch decisions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete urgency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Routine handling
    Low,
    /// Prompt handling
    Medium,
    /// Immediate handling
    High,
}

impl Urgency {
    /// Get the urgency name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }

    /// Parse an urgency level, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            _ => None,
        }
    }

    /// Map an additive severity score to a level (>=3 high, >=2 medium)
    pub fn from_severity(severity: u32) -> Self {
        match severity {
            0 | 1 => Urgency::Low,
            2 => Urgency::Medium,
            _ => Urgency::High,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preliminary decision assembled from category mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDecision {
    /// Agency the category maps to
    pub agency_guess: String,

    /// Urgency from the severity scorer
    pub urgency_guess: Urgency,

    /// Recommended action for the category
    pub action_guess: String,

    /// Seed confidence in [0, 1]
    pub confidence_stub: f64,
}

/// Final dispatch decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Responsible agency
    pub agency: String,

    /// Urgency level
    pub urgency: Urgency,

    /// Recommended action
    pub action: String,

    /// Comma-joined trace of the signals used
    pub justification: String,

    /// Confidence rounded to two decimals, in [0, 1]
    pub confidence: f64,
}
