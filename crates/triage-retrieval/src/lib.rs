//! Triage Retrieval Layer
//!
//! Finds historical cases similar to a new complaint.
//!
//! # Architecture
//!
//! ```text
//! ParsedComplaint → query text → embedding service → vector index (filtered) → CaseRecord[]
//! ```
//!
//! Implementations of the `CaseRetriever` trait from `triage-domain`:
//!
//! - `VectorRetriever`: OpenAI-compatible `/embeddings` plus a Pinecone-compatible `/query`
//! - `StaticRetriever`: fixed case list loaded from JSON, for offline runs and tests
//!
//! # Examples
//!
//! ```
//! use triage_retrieval::StaticRetriever;
//! use triage_domain::traits::CaseRetriever;
//! use triage_domain::{Category, ParsedComplaint};
//!
//! let retriever = StaticRetriever::from_json(r#"[
//!     {"id": "311-1", "score": 0.81, "metadata": {"agency": "DSNY", "status": "Closed"}}
//! ]"#).unwrap();
//!
//! let parsed = ParsedComplaint::new("garbage on the corner", Category::Sanitation);
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let cases = rt.block_on(retriever.retrieve(&parsed, 3)).unwrap();
//! assert_eq!(cases[0].metadata.agency.as_deref(), Some("DSNY"));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod embedding;
mod error;
mod http;
pub mod index;
pub mod query;
mod retriever;

pub use config::RetrievalConfig;
pub use embedding::EmbeddingClient;
pub use error::RetrievalError;
pub use index::VectorIndexClient;
pub use query::{build_filter, build_query_text};
pub use retriever::{StaticRetriever, VectorRetriever};
