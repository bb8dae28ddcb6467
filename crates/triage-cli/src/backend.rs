//! Retriever and language-model selection for commands.

use crate::cli::BackendArgs;
use crate::error::Result;
use std::path::Path;
use tracing::info;
use triage_agent::{AgentConfig, DecisionMode};
use triage_domain::traits::CaseRetriever;
use triage_domain::{CaseRecord, ParsedComplaint};
use triage_llm::{ChatCompletionsProvider, LlmConfig};
use triage_retrieval::{RetrievalError, StaticRetriever, VectorRetriever};

/// Either a fixed case list or the live vector index.
pub enum Retriever {
    /// Cases loaded from a JSON file
    Static(StaticRetriever),
    /// Embedding service plus vector index, configured from the environment
    Vector(VectorRetriever),
}

impl Retriever {
    /// Load cases from `path`, or connect to the vector index when no path is given.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let retriever = StaticRetriever::from_file(path)?;
                info!("Loaded {} cases from {}", retriever.cases().len(), path.display());
                Ok(Self::Static(retriever))
            }
            None => Ok(Self::Vector(VectorRetriever::from_env()?)),
        }
    }
}

impl CaseRetriever for Retriever {
    type Error = RetrievalError;

    async fn retrieve(
        &self,
        parsed: &ParsedComplaint,
        top_k: usize,
    ) -> std::result::Result<Vec<CaseRecord>, Self::Error> {
        match self {
            Self::Static(retriever) => retriever.retrieve(parsed, top_k).await,
            Self::Vector(retriever) => retriever.retrieve(parsed, top_k).await,
        }
    }
}

/// Apply command-line overrides to the agent configuration.
pub fn apply_overrides(config: &mut AgentConfig, args: &BackendArgs) {
    if args.llm {
        config.decision_mode = DecisionMode::Llm;
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
}

/// Build the chat provider when the configuration asks for model decisions.
pub fn llm_provider(config: &AgentConfig) -> Result<Option<ChatCompletionsProvider>> {
    if config.decision_mode != DecisionMode::Llm {
        return Ok(None);
    }
    let llm_config = LlmConfig::from_env()?.with_timeout_secs(config.llm_timeout_secs);
    info!("Deciding with model {}", llm_config.chat_model);
    Ok(Some(ChatCompletionsProvider::new(llm_config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use triage_domain::Category;

    #[test]
    fn test_apply_overrides() {
        let mut config = AgentConfig::default();
        apply_overrides(
            &mut config,
            &BackendArgs {
                cases: None,
                llm: true,
                top_k: Some(8),
            },
        );
        assert_eq!(config.decision_mode, DecisionMode::Llm);
        assert_eq!(config.top_k, 8);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = AgentConfig::default();
        config.decision_mode = DecisionMode::Llm;
        apply_overrides(&mut config, &BackendArgs::default());
        assert_eq!(config.decision_mode, DecisionMode::Llm);
        assert_eq!(config.top_k, AgentConfig::default().top_k);
    }

    #[test]
    fn test_engine_mode_needs_no_provider() {
        assert!(llm_provider(&AgentConfig::default()).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_retriever_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "c1", "score": 0.9, "metadata": {{"agency": "NYPD"}}}},
               {{"id": "c2", "score": 0.8, "metadata": {{"agency": "DSNY"}}}}]"#
        )
        .unwrap();

        let retriever = Retriever::open(Some(file.path())).unwrap();
        assert!(matches!(retriever, Retriever::Static(_)));

        let parsed = ParsedComplaint::new("loud music", Category::Noise);
        let cases = retriever.retrieve(&parsed, 1).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, "c1");
    }

    #[test]
    fn test_missing_case_file() {
        assert!(Retriever::open(Some(Path::new("/nonexistent/cases.json"))).is_err());
    }
}
