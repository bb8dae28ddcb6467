//! Complaint categories and the boroughs the retrieval index is partitioned by

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse complaint type
///
/// The declaration order of the keyword-scored variants is significant: when two
/// categories collect the same number of keyword hits, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Loud parties, music, shouting
    Noise,
    /// Trash, rodents, illegal dumping
    Sanitation,
    /// Blocked driveways, double parking, abandoned vehicles
    Parking,
    /// Potholes, street lights, sidewalks
    Street,
    /// Leaks, sewers, hydrants, flooding
    Water,
    /// Hazards and crime
    Safety,
    /// No reliable signal
    Unknown,
}

impl Category {
    /// Categories that take part in keyword scoring, in tie-break order
    pub const SCORED: [Category; 6] = [
        Category::Noise,
        Category::Sanitation,
        Category::Parking,
        Category::Street,
        Category::Water,
        Category::Safety,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Noise => "noise",
            Category::Sanitation => "sanitation",
            Category::Parking => "parking",
            Category::Street => "street",
            Category::Water => "water",
            Category::Safety => "safety",
            Category::Unknown => "unknown",
        }
    }

    /// Parse a category from a string, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "noise" => Some(Category::Noise),
            "sanitation" => Some(Category::Sanitation),
            "parking" => Some(Category::Parking),
            "street" => Some(Category::Street),
            "water" => Some(Category::Water),
            "safety" => Some(Category::Safety),
            "unknown" => Some(Category::Unknown),
            _ => None,
        }
    }

    /// Whether the classifier found no usable signal
    pub fn is_unknown(&self) -> bool {
        matches!(self, Category::Unknown)
    }

    /// Agency responsible for this category
    pub fn agency(&self) -> &'static str {
        match self {
            Category::Noise => "Noise Control / Non-emergency Police",
            Category::Sanitation => "Sanitation Department",
            Category::Parking => "Parking Enforcement",
            Category::Street => "Public Works / DOT",
            Category::Water => "Water & Sewer Department",
            Category::Safety => "Emergency Services / Police",
            Category::Unknown => "311 Triage (Unknown)",
        }
    }

    /// Recommended first action for this category
    pub fn action(&self) -> &'static str {
        match self {
            Category::Noise => {
                "Create noise complaint ticket; advise caller; dispatch non-emergency check if repeated"
            }
            Category::Sanitation => "Create sanitation ticket; schedule cleanup/inspection",
            Category::Parking => {
                "Create parking enforcement request; recommend tow/inspection if blocking"
            }
            Category::Street => "Create public works ticket; schedule repair/inspection",
            Category::Water => "Create water/sewer ticket; dispatch crew if leak/flood risk",
            Category::Safety => "Escalate immediately to emergency services",
            Category::Unknown => "Log ticket for review",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}

/// New York City borough
///
/// Serialized upper-case, matching the metadata stored alongside historical cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Borough {
    /// Brooklyn
    Brooklyn,
    /// Manhattan
    Manhattan,
    /// Queens
    Queens,
    /// The Bronx
    Bronx,
    /// Staten Island
    StatenIsland,
}

impl Borough {
    /// All boroughs, in lookup order
    pub const ALL: [Borough; 5] = [
        Borough::Brooklyn,
        Borough::Manhattan,
        Borough::Queens,
        Borough::Bronx,
        Borough::StatenIsland,
    ];

    /// Title-cased display name ("Staten Island")
    pub fn display_name(&self) -> &'static str {
        match self {
            Borough::Brooklyn => "Brooklyn",
            Borough::Manhattan => "Manhattan",
            Borough::Queens => "Queens",
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Upper-cased name used in retrieval filters ("STATEN ISLAND")
    pub fn filter_value(&self) -> &'static str {
        match self {
            Borough::Brooklyn => "BROOKLYN",
            Borough::Manhattan => "MANHATTAN",
            Borough::Queens => "QUEENS",
            Borough::Bronx => "BRONX",
            Borough::StatenIsland => "STATEN ISLAND",
        }
    }

    /// Parse a borough name in any case, with space or underscore separators
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        let normalized = normalized.strip_prefix("the ").unwrap_or(&normalized);
        Self::ALL
            .into_iter()
            .find(|b| b.display_name().to_lowercase() == normalized)
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
