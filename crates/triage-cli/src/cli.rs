//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Triage CLI - Route 311 complaints to the right agency.
#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON envelope
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Triage a single complaint
    Run(RunArgs),

    /// Measure routing accuracy over labelled complaints
    Eval(EvalArgs),

    /// Print the effective configuration as TOML
    Config,
}

/// Where similar cases and decisions come from.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendArgs {
    /// JSON file of historical cases to use instead of the live index
    #[arg(long)]
    pub cases: Option<PathBuf>,

    /// Decide with the language model (falls back to the engine on failure)
    #[arg(long)]
    pub llm: bool,

    /// Number of similar cases to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Complaint text
    #[arg(required_unless_present = "complaint", conflicts_with = "complaint")]
    pub text: Option<String>,

    /// JSON file holding a complaint record
    #[arg(long)]
    pub complaint: Option<PathBuf>,

    /// Print the step trace after the decision
    #[arg(long)]
    pub steps: bool,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Arguments for the eval command.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// JSONL file of `{"complaint_text": .., "agency": ..}` samples
    pub samples: PathBuf,

    /// Evaluate at most this many samples
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub backend: BackendArgs,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_text() {
        let cli = Cli::parse_from(["triage", "run", "loud party in Brooklyn", "--cases", "cases.json"]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.text.as_deref(), Some("loud party in Brooklyn"));
                assert_eq!(args.backend.cases, Some(PathBuf::from("cases.json")));
                assert!(!args.backend.llm);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_with_complaint_file() {
        let cli = Cli::parse_from(["triage", "--format", "json", "run", "--complaint", "c.json", "--llm"]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Command::Run(args) => {
                assert!(args.text.is_none());
                assert!(args.backend.llm);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_requires_input() {
        assert!(Cli::try_parse_from(["triage", "run"]).is_err());
        assert!(Cli::try_parse_from(["triage", "run", "text", "--complaint", "c.json"]).is_err());
    }

    #[test]
    fn test_eval_command() {
        let cli = Cli::parse_from(["triage", "eval", "samples.jsonl", "-k", "5", "--limit", "20"]);
        match cli.command {
            Command::Eval(args) => {
                assert_eq!(args.samples, PathBuf::from("samples.jsonl"));
                assert_eq!(args.backend.top_k, Some(5));
                assert_eq!(args.limit, Some(20));
            }
            _ => panic!("Expected Eval command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["triage", "config", "--no-color", "--config", "triage.toml"]);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("triage.toml")));
        assert!(matches!(cli.command, Command::Config));
    }
}
