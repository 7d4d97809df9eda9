//! Userdeck Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Pulls user records from a paginated listing service, keeps the ones with a
//! valid 10-digit phone number, and picks the youngest few for display.
//!
//! # Pipeline
//!
//! - **Pager**: walks the listing pages by continuation token
//! - **Fetcher**: resolves each id to its detail record
//! - **Validator**: normalizes the phone number, rejects the rest
//! - **Ingestor**: drives the above into a store, skipping failures
//! - **Selector**: youngest `n` by age, then ordered by name
//!
//! # Example
//!
//! ```no_run
//! use userdeck_ingest::{config::PipelineConfig, pipeline, render};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::new("https://example.com/sample/")?;
//!     let outcome = pipeline::run(&config).await?;
//!     render::render(config.output, &outcome.selected, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod fetcher;
pub mod ingestor;
pub mod pager;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod store;
pub mod transport;
pub mod validator;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{StoreError, TransportError};
pub use validator::{validate, ValidatedUser, ValidationError};

use clap::Parser;
use config::{PipelineConfig, DEFAULT_BASE_URL};
use render::OutputFormat;
use selector::DEFAULT_SELECTION_SIZE;
use std::time::Duration;
use store::StoreKind;

/// Show the youngest users with a valid phone number
#[derive(Parser, Debug)]
#[command(name = "userdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the listing service
    #[arg(long, env = "USERDECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of youngest users to show
    #[arg(short = 'n', long, env = "USERDECK_SELECTION_SIZE", default_value_t = DEFAULT_SELECTION_SIZE)]
    pub limit: usize,

    /// Where validated users are kept during the run
    #[arg(long, value_enum, env = "USERDECK_STORE", default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Output format
    #[arg(short, long, value_enum, env = "USERDECK_OUTPUT", default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, env = "USERDECK_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Validate the arguments into a pipeline configuration
    pub fn to_config(&self) -> userdeck_common::Result<PipelineConfig> {
        Ok(PipelineConfig::new(&self.base_url)?
            .with_selection_size(self.limit)?
            .with_store(self.store)
            .with_output(self.format)
            .with_request_timeout(self.request_timeout_secs.map(Duration::from_secs))?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["userdeck"]).unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.selection_size, 5);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.output, OutputFormat::Table);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    #[serial]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "userdeck",
            "--base-url",
            "http://localhost:3000/sample",
            "-n",
            "3",
            "--store",
            "sqlite",
            "--format",
            "json",
            "--request-timeout-secs",
            "10",
        ])
        .unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.selection_size, 3);
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    #[serial]
    fn test_cli_env_fallback() {
        std::env::set_var("USERDECK_BASE_URL", "http://env.test/sample/");
        std::env::set_var("USERDECK_OUTPUT", "cards");

        let cli = Cli::try_parse_from(["userdeck"]).unwrap();

        std::env::remove_var("USERDECK_BASE_URL");
        std::env::remove_var("USERDECK_OUTPUT");

        let config = cli.to_config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://env.test/sample/");
        assert_eq!(config.output, OutputFormat::Cards);
    }

    #[test]
    #[serial]
    fn test_cli_rejects_zero_limit() {
        let cli = Cli::try_parse_from(["userdeck", "--limit", "0"]).unwrap();
        assert!(cli.to_config().is_err());
    }
}
