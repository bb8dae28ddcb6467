//! Triage LLM Provider Layer
//!
//! Language-model backed alternative to the deterministic decision engine.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `triage-domain`
//! and the `LlmDecider`, which turns a parsed complaint plus evidence into a
//! `Decision` by asking the model for strict JSON.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible `/chat/completions` endpoint
//!
//! # Examples
//!
//! ```
//! use triage_llm::MockProvider;
//! use triage_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let result = rt.block_on(provider.complete("system", "user")).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod config;
pub mod decider;
mod error;
mod mock;

pub use chat::ChatCompletionsProvider;
pub use config::LlmConfig;
pub use decider::{parse_decision, LlmDecider};
pub use error::LlmError;
pub use mock::MockProvider;
