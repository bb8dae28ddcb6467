//! Historical-case evidence and its summary

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Metadata stored with a historical case in the retrieval index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseMetadata {
    /// Agency that handled the case
    pub agency: Option<String>,
    /// Original complaint type
    pub complaint_type: Option<String>,
    /// Free-text descriptor
    pub descriptor: Option<String>,
    /// Case status ("Closed", ...)
    pub status: Option<String>,
    /// Creation date as recorded by the source system
    pub created_date: Option<String>,
}

/// A ranked historical case returned by the retrieval service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case identifier
    pub id: String,
    /// Similarity score
    #[serde(default)]
    pub score: Option<f64>,
    /// Case metadata
    #[serde(default)]
    pub metadata: CaseMetadata,
}

/// Flattened case for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// Case identifier
    pub id: String,
    /// Similarity score
    pub score: Option<f64>,
    /// Agency that handled the case
    pub agency: Option<String>,
    /// Original complaint type
    pub complaint_type: Option<String>,
    /// Free-text descriptor
    pub descriptor: Option<String>,
    /// Case status
    pub status: Option<String>,
    /// Creation date
    pub created_date: Option<String>,
}

impl From<&CaseRecord> for CaseSummary {
    fn from(case: &CaseRecord) -> Self {
        Self {
            id: case.id.clone(),
            score: case.score,
            agency: case.metadata.agency.clone(),
            complaint_type: case.metadata.complaint_type.clone(),
            descriptor: case.metadata.descriptor.clone(),
            status: case.metadata.status.clone(),
            created_date: case.metadata.created_date.clone(),
        }
    }
}

/// Agency vote counts, kept in the order agencies were first seen
///
/// Serializes as a JSON object. Ordering matters: when two agencies have the
/// same count, the one seen first is the top agency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgencyCounts(Vec<(String, usize)>);

impl AgencyCounts {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one vote for an agency
    pub fn increment(&mut self, agency: &str) {
        match self.0.iter_mut().find(|(name, _)| name == agency) {
            Some((_, count)) => *count += 1,
            None => self.0.push((agency.to_string(), 1)),
        }
    }

    /// Votes recorded for an agency
    pub fn get(&self, agency: &str) -> usize {
        self.0
            .iter()
            .find(|(name, _)| name == agency)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Agency with the most votes; the earliest seen wins ties
    pub fn top(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in &self.0 {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((name.as_str(), *count));
            }
        }
        best
    }

    /// Sum of all votes
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }

    /// Number of distinct agencies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no votes were recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate agencies and counts in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, usize)> for AgencyCounts {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut counts = AgencyCounts::new();
        for (name, count) in iter {
            match counts.0.iter_mut().find(|(n, _)| *n == name) {
                Some((_, c)) => *c += count,
                None => counts.0.push((name, count)),
            }
        }
        counts
    }
}

impl Serialize for AgencyCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AgencyCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = AgencyCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of agency name to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, count)) = access.next_entry::<String, usize>()? {
                    entries.push((name, count));
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Aggregated evidence from similarity-retrieved historical cases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    /// Cases in retrieval order
    #[serde(default)]
    pub top_cases: Vec<CaseSummary>,

    /// One-line human summary
    #[serde(default)]
    pub evidence_summary: String,

    /// Agency votes; cases without an agency are not counted
    #[serde(default)]
    pub agency_counts: AgencyCounts,

    /// Number of retrieved cases
    #[serde(default)]
    pub total_matches: usize,

    /// Highest similarity score among retrieved cases
    #[serde(default)]
    pub top_score: Option<f64>,
}

impl EvidenceSummary {
    /// Share of retrieved cases attributed to the top agency (0 when nothing matched)
    pub fn vote_ratio(&self) -> f64 {
        match (self.agency_counts.top(), self.total_matches) {
            (Some((_, count)), total) if total > 0 => count as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// Summarize ranked cases into agency votes and the best similarity score
pub fn summarize_evidence(cases: &[CaseRecord]) -> EvidenceSummary {
    let mut agency_counts = AgencyCounts::new();
    let mut top_score: Option<f64> = None;

    for case in cases {
        if let Some(agency) = case.metadata.agency.as_deref().filter(|a| !a.is_empty()) {
            agency_counts.increment(agency);
        }
        if let Some(score) = case.score {
            top_score = Some(top_score.map_or(score, |best| best.max(score)));
        }
    }

    let mut evidence_summary = if cases.is_empty() {
        "No similar cases found.".to_string()
    } else {
        "Retrieved similar historical cases.".to_string()
    };
    if !agency_counts.is_empty() {
        let mut names: Vec<&str> = agency_counts.iter().map(|(name, _)| name).collect();
        names.sort_unstable();
        evidence_summary.push_str(&format!(" Top agencies: {}.", names.join(", ")));
    }

    EvidenceSummary {
        top_cases: cases.iter().map(CaseSummary::from).collect(),
        evidence_summary,
        agency_counts,
        total_matches: cases.len(),
        top_score,
    }
}
