//! userdeck - show the youngest users with a valid phone number

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use userdeck_common::logging::{init_logging, LogConfig, LogLevel};
use userdeck_ingest::{pipeline, render, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("userdeck")
        .filter_directives("hyper_util=warn,reqwest=warn")
        .build()
        .with_env_overrides()?;
    let _log_guard = init_logging(&log_config)?;

    let config = cli.to_config().context("Invalid configuration")?;
    let outcome = pipeline::run(&config).await?;

    info!(
        inserted = outcome.report.inserted,
        skipped = outcome.report.skipped(),
        selected = outcome.selected.len(),
        "Retrieved youngest users"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render(config.output, &outcome.selected, &mut out)
        .context("Failed to write results")?;

    Ok(())
}
