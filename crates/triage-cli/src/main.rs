//! Triage CLI - Route 311 complaints to the responsible agency.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use triage_cli::commands;
use triage_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> triage_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await,
        Command::Eval(args) => commands::execute_eval(args, &config, &formatter).await,
        Command::Config => commands::execute_config(&config),
    }
}
