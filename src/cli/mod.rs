//! CLI command implementations

pub mod error;
pub mod fetch;
pub mod flatten;
pub mod report;

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::downloader::config::RetryPolicy;
use crate::fetcher::http::{ApiHttpClient, ReqwestTransport, API_KEY_HEADER, DEFAULT_BASE_URL};

pub use error::CliError;
pub use fetch::FetchArgs;
pub use flatten::FlattenCommand;
pub use report::ReportArgs;

/// Movie Data Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "movie-data-downloader")]
#[command(about = "Download and flatten movie and person data from the Kinopoisk API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL
    #[arg(long, global = true, env = "KINOPOISK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key sent with every request
    #[arg(long, global = true, env = "KINOPOISK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value = "60")]
    pub timeout_secs: u64,

    /// Maximum attempts for a timed-out request (default: 5, range: 1-20)
    #[arg(long, global = true, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub max_attempts: u32,

    /// Delay between timed-out attempts in seconds
    #[arg(long, global = true, default_value = "20")]
    pub retry_delay_secs: u64,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch raw records for a list of identifiers
    Fetch(FetchArgs),

    /// Flatten raw records into CSV rows
    #[command(subcommand)]
    Flatten(FlattenCommand),

    /// Report missing values per column of a CSV file
    Report(ReportArgs),
}

impl Cli {
    /// Retry policy from the global flags
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    /// Build the HTTP client from the global flags
    pub fn http_client(&self) -> Result<ApiHttpClient, CliError> {
        let transport = ReqwestTransport::new(Duration::from_secs(self.timeout_secs))?;
        let client =
            ApiHttpClient::new(transport, self.base_url.as_str()).with_retry_policy(self.retry_policy());

        match self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Ok(client.with_header(API_KEY_HEADER, key)?),
            None => {
                tracing::warn!("No API key configured; requests are sent unauthenticated");
                Ok(client)
            }
        }
    }
}

/// Output format for report-style commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
}
