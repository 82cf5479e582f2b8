//! S.A.T. Mission - CLI entry point
//!
//! Wires config, logging, the LLM client, and the TUI together, then
//! hands control to the mission runner.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use satmission::cli::{Cli, get_log_path};
use satmission::coach::Coach;
use satmission::config::Config;
use satmission::llm::create_client;
use satmission::prompts::PromptLoader;
use satmission::tui;

fn setup_logging(log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Write to the log file, never stdout/stderr: the terminal belongs
    // to the TUI.
    let level: tracing::Level = log_level
        .map(|l| l.parse().unwrap_or(tracing::Level::INFO))
        .unwrap_or(tracing::Level::INFO);
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(
        "S.A.T. mission loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    let client = create_client(&config.llm).context("Failed to create LLM client")?;
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let coach = Arc::new(Coach::new(client, PromptLoader::new(cwd)));

    tui::run(coach).await
}
