//! Triage Gatekeeper
//!
//! Final policy deciding whether a decision needs a human before dispatch.
//!
//! The gate flags a decision for review when:
//! - Its confidence is below the review threshold
//! - The category could not be determined
//! - No location-like field is present
//!
//! # Examples
//!
//! ```
//! use triage_domain::{Category, Decision, ParsedComplaint, Urgency};
//! use triage_gatekeeper::{GateConfig, ReviewGate};
//!
//! let gate = ReviewGate::new(GateConfig::default());
//! let parsed = ParsedComplaint::new("loud music", Category::Noise);
//! let decision = Decision {
//!     agency: Category::Noise.agency().to_string(),
//!     urgency: Urgency::Low,
//!     action: Category::Noise.action().to_string(),
//!     justification: "category=noise".to_string(),
//!     confidence: 0.75,
//! };
//!
//! let verdict = gate.evaluate(&decision, &parsed);
//! assert!(verdict.needs_review);
//! assert_eq!(verdict.critical_missing.len(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod gate;

pub use config::GateConfig;
pub use error::GatekeeperError;
pub use gate::{CriticalField, ReviewGate, ReviewReason, ReviewVerdict};
