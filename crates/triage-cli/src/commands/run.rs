//! Triage a single complaint.

use crate::backend::{apply_overrides, llm_provider, Retriever};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use triage_agent::{ComplaintRecord, ExecuteRequest, TriageAgent};

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let request = load_request(&args)?;

    let mut agent_config = config.agent.clone();
    apply_overrides(&mut agent_config, &args.backend);

    let retriever = Retriever::open(args.backend.cases.as_deref())?;
    let provider = llm_provider(&agent_config)?;
    let agent = TriageAgent::new(agent_config, retriever)?;

    let response = match provider {
        Some(provider) => agent.with_llm(provider).execute(request).await,
        None => agent.execute(request).await,
    };

    println!("{}", formatter.format_execution(&response, args.steps)?);

    match response.error {
        Some(error) => Err(CliError::Execution(error)),
        None => Ok(()),
    }
}

/// Build the request from the positional text or the complaint record file.
pub fn load_request(args: &RunArgs) -> Result<ExecuteRequest> {
    if let Some(path) = &args.complaint {
        let contents = fs::read_to_string(path)?;
        let record: ComplaintRecord = serde_json::from_str(&contents)?;
        return Ok(ExecuteRequest::complaint(record));
    }

    match &args.text {
        Some(text) if !text.trim().is_empty() => Ok(ExecuteRequest::prompt(text.as_str())),
        _ => Err(CliError::InvalidInput(
            "complaint text must not be empty".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BackendArgs;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn args(text: Option<&str>, complaint: Option<PathBuf>) -> RunArgs {
        RunArgs {
            text: text.map(str::to_string),
            complaint,
            steps: false,
            backend: BackendArgs::default(),
        }
    }

    #[test]
    fn test_prompt_request() {
        let request = load_request(&args(Some("loud music"), None)).unwrap();
        assert_eq!(request.prompt.as_deref(), Some("loud music"));
        assert!(request.complaint.is_none());
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let err = load_request(&args(Some("   "), None)).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_complaint_record_request() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"complaint_id": "311-42", "complaint_text": "rats by the bins", "borough": "queens"}}"#
        )
        .unwrap();

        let request = load_request(&args(None, Some(file.path().to_path_buf()))).unwrap();
        let record = request.complaint.unwrap();
        assert_eq!(record.complaint_id.as_deref(), Some("311-42"));
        assert_eq!(record.borough.as_deref(), Some("queens"));
    }

    #[test]
    fn test_malformed_complaint_record() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_request(&args(None, Some(file.path().to_path_buf()))).unwrap_err();
        assert!(matches!(err, CliError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_run_with_case_file() {
        let mut cases = NamedTempFile::new().unwrap();
        write!(
            cases,
            r#"[{{"id": "a", "score": 0.91, "metadata": {{"agency": "NYPD"}}}},
               {{"id": "b", "score": 0.88, "metadata": {{"agency": "NYPD"}}}}]"#
        )
        .unwrap();

        let mut run_args = args(Some("loud party music at 2am in Brooklyn"), None);
        run_args.backend.cases = Some(cases.path().to_path_buf());

        let formatter = Formatter::new(crate::config::OutputFormat::Text, false);
        execute_run(run_args, &Config::default(), &formatter).await.unwrap();
    }
}
