//! Triage Extractor
//!
//! Turns free complaint text into the structured signals the decision engine
//! consumes.
//!
//! # Architecture
//!
//! ```text
//! Text → signals (time, location, recurrence) → classifier → urgency scorer → draft
//! ```
//!
//! # Key Features
//!
//! - **Signal Extraction**: 12/24-hour times, borough or "in <Place>" locations, recurrence phrases
//! - **Layered Classification**: hazard and crime language overrides keyword scoring; vague
//!   language without a hazard is held at `unknown`
//! - **Additive Urgency**: severity points from life-threatening, hazardous, crime, night-noise
//!   and recurrence signals
//! - **Draft Assembly**: exhaustive category → agency/action mapping with a seed confidence
//!
//! # Example Usage
//!
//! ```
//! use triage_extractor::{SignalExtractor, ExtractorConfig};
//! use triage_domain::{Category, Urgency};
//!
//! let extractor = SignalExtractor::new(ExtractorConfig::default());
//! let extraction = extractor
//!     .extract("loud party at 2am in Brooklyn, recurring every weekend")
//!     .unwrap();
//!
//! assert_eq!(extraction.parsed.category, Category::Noise);
//! assert_eq!(extraction.parsed.time_24h.unwrap().to_string(), "02:00");
//! assert_eq!(extraction.draft.urgency_guess, Urgency::Medium);
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod patterns;
mod signals;
mod classifier;
mod urgency;
mod draft;
mod extractor;


pub use error::ExtractorError;
pub use config::ExtractorConfig;
pub use signals::{extract_borough, extract_location, extract_recurrence, extract_time};
pub use classifier::{classify_category, property_crime_in_progress};
pub use urgency::{estimate_urgency, severity_score};
pub use draft::assemble_draft;
pub use extractor::{ComplaintContext, Extraction, SignalExtractor};
