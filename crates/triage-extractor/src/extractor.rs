//! Core Extractor implementation

use crate::classifier::classify_category;
use crate::config::ExtractorConfig;
use crate::draft::assemble_draft;
use crate::error::ExtractorError;
use crate::signals::{extract_location, extract_recurrence, extract_time};
use crate::urgency::estimate_urgency;
use serde::{Deserialize, Serialize};
use triage_domain::{Borough, ClockTime, DraftDecision, ParsedComplaint};
use tracing::{debug, info};

/// Structured fields supplied alongside the complaint text (e.g., an intake form)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintContext {
    /// Borough chosen on the form; overrides any borough found in the text
    pub borough: Option<Borough>,

    /// Free-form location details
    pub location_details: Option<String>,

    /// Incident time; used only when the text carries no time
    pub incident_time: Option<ClockTime>,
}

/// Result of extracting a single complaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Structured signals
    pub parsed: ParsedComplaint,

    /// Preliminary decision built from the signals
    pub draft: DraftDecision,
}

/// Deterministic signal extractor
#[derive(Debug, Clone, Default)]
pub struct SignalExtractor {
    config: ExtractorConfig,
}

impl SignalExtractor {
    /// Create a new extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Create a new extractor after validating the configuration
    pub fn try_new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self::new(config))
    }

    /// Get the active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract signals from complaint text alone
    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractorError> {
        self.extract_with_context(text, &ComplaintContext::default())
    }

    /// Extract signals from complaint text, merging structured form fields
    pub fn extract_with_context(
        &self,
        text: &str,
        context: &ComplaintContext,
    ) -> Result<Extraction, ExtractorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractorError::EmptyText);
        }

        let category = classify_category(text);
        let location = extract_location(text);
        let recurrence = extract_recurrence(text);

        let borough = context
            .borough
            .or_else(|| location.as_deref().and_then(Borough::parse));
        let time_24h = extract_time(text).or(context.incident_time);

        let location_details = context
            .location_details
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let urgency = estimate_urgency(text, category, time_24h);

        debug!(
            "Signals: category={}, location={:?}, borough={:?}, time={:?}, recurrence={:?}",
            category, location, borough, time_24h, recurrence
        );

        let draft = assemble_draft(category, urgency, &self.config);
        let parsed = ParsedComplaint {
            category,
            location,
            location_details,
            borough,
            time_24h,
            recurrence,
            complaint_text: text.to_string(),
        };

        info!(
            "Extracted complaint: category={}, urgency={}, seed={:.2}",
            parsed.category, draft.urgency_guess, draft.confidence_stub
        );

        Ok(Extraction { parsed, draft })
    }
}
