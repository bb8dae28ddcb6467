//! Routing accuracy over labelled samples.

use crate::backend::{apply_overrides, llm_provider, Retriever};
use crate::cli::EvalArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use std::fs;
use triage_agent::{evaluate_routing, RoutingSample, TriageAgent};

/// Execute the eval command.
pub async fn execute_eval(args: EvalArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let contents = fs::read_to_string(&args.samples)?;
    let mut samples = RoutingSample::parse_jsonl(&contents)?;
    if let Some(limit) = args.limit {
        samples.truncate(limit);
    }
    if formatter.format() == OutputFormat::Text {
        eprintln!(
            "{}",
            formatter.info(&format!("Evaluating {} samples", samples.len()))
        );
    }

    let mut agent_config = config.agent.clone();
    apply_overrides(&mut agent_config, &args.backend);

    let retriever = Retriever::open(args.backend.cases.as_deref())?;
    let provider = llm_provider(&agent_config)?;
    let agent = TriageAgent::new(agent_config, retriever)?;

    let report = match provider {
        Some(provider) => evaluate_routing(&agent.with_llm(provider), &samples).await,
        None => evaluate_routing(&agent, &samples).await,
    };

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
