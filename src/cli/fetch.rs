//! Fetch command implementation

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use tracing::info;

use super::{Cli, CliError};
use crate::downloader::config::DEFAULT_CHUNK_SIZE;
use crate::fetcher::pagination::BatchLoader;
use crate::output::json::{open_json_as, save_json};
use crate::presets::Preset;
use crate::query::QueryParams;
use crate::Identifier;

/// Arguments of the `fetch` command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Request preset
    #[arg(value_enum)]
    pub preset: Preset,

    /// Endpoint override (defaults to the preset's endpoint)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// JSON file holding an array of identifiers
    #[arg(long, conflicts_with = "ids", required_unless_present = "ids")]
    pub ids_file: Option<PathBuf>,

    /// Comma-separated identifiers (e.g., 326,435,448)
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,

    /// Query parameter receiving each identifier chunk
    #[arg(long, default_value = "id")]
    pub id_param: String,

    /// Identifiers per filter request
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: usize,

    /// Pause in seconds before every 5th request
    #[arg(long, default_value = "20")]
    pub pause_secs: u64,

    /// JSON object file whose parameters override or extend the preset
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Raw JSON output path
    #[arg(long)]
    pub output: PathBuf,
}

/// Parse and validate the chunk size
fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("chunk size must be at least 1".to_string());
    }
    Ok(value)
}

/// Parse one identifier: integers become numeric ids, anything else stays text
fn parse_identifier(raw: &str) -> Option<Identifier> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.parse::<i64>()
            .map(Identifier::Numeric)
            .unwrap_or_else(|_| Identifier::Text(raw.to_string())),
    )
}

/// Load identifiers from a JSON array file
pub fn read_ids_file(path: &Path) -> Result<Vec<Identifier>, CliError> {
    let ids: Vec<Identifier> = open_json_as(path)?;
    info!("Read {} identifiers from {}", ids.len(), path.display());
    Ok(ids)
}

impl FetchArgs {
    /// Identifiers to load, from `--ids-file` or `--ids`
    pub fn identifiers(&self) -> Result<Vec<Identifier>, CliError> {
        match &self.ids_file {
            Some(path) => read_ids_file(path),
            None => Ok(self.ids.iter().filter_map(|id| parse_identifier(id)).collect()),
        }
    }

    /// Base parameters: the preset with any `--params-file` overrides
    pub fn params(&self) -> Result<QueryParams, CliError> {
        match &self.params_file {
            Some(path) => self
                .preset
                .params_with_overrides(path)
                .map_err(CliError::ConfigurationError),
            None => Ok(self.preset.params()),
        }
    }

    /// Execute the fetch
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let ids = self.identifiers()?;
        if ids.is_empty() {
            return Err(CliError::InvalidArgument(
                "no identifiers supplied".to_string(),
            ));
        }

        let params = self.params()?;
        let endpoint = self
            .endpoint
            .as_deref()
            .unwrap_or_else(|| self.preset.endpoint());

        info!(
            "Fetching {} identifiers with preset {} from {} (chunk size {})",
            ids.len(),
            self.preset,
            endpoint,
            self.chunk_size
        );

        let client = cli.http_client()?;
        let mut loader = BatchLoader::new(&client).with_pause(Duration::from_secs(self.pause_secs));

        let started = Instant::now();
        let docs = loader
            .load(endpoint, &params, &self.id_param, &ids, self.chunk_size)
            .await?;

        save_json(&self.output, &docs)?;
        info!(
            "Saved {} records to {} ({} requests, {:.1}s)",
            docs.len(),
            self.output.display(),
            loader.last_request_count(),
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }
}
