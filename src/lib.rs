//! # Movie Data Downloader Library
//!
//! Fetches paginated movie and person records from the Kinopoisk API,
//! flattens the nested JSON into tabular rows and writes JSON/CSV artifacts
//! for downstream analysis.
//!
//! ## Features
//!
//! - **Chunked Pagination**: Identifier lists are split into fixed-size chunks and
//!   every page of every chunk is collected in request order
//! - **Retry on Timeout**: Read timeouts are retried with a fixed delay, any other
//!   HTTP failure is surfaced immediately
//! - **Request Throttling**: A pause is inserted before every 5th request
//! - **Flattening**: Movie and person records become flat rows ready for CSV export
//! - **Missing-Data Report**: Per-column counts and percentages of empty values
//!
//! ## Quick Start
//!
//! ```no_run
//! use movie_data_downloader::fetcher::http::ApiHttpClient;
//! use movie_data_downloader::fetcher::pagination::BatchLoader;
//! use movie_data_downloader::presets::Preset;
//! use movie_data_downloader::Identifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiHttpClient::with_api_key("https://api.kinopoisk.dev", "MY-KEY")?;
//! let mut loader = BatchLoader::new(&client);
//!
//! let ids = vec![Identifier::Numeric(326), Identifier::Numeric(435)];
//! let docs = loader
//!     .load(Preset::MoviesMain.endpoint(), &Preset::MoviesMain.params(), "id", &ids, 250)
//!     .await?;
//!
//! let rows = movie_data_downloader::flatten::movies::flatten_movies(
//!     &docs,
//!     movie_data_downloader::flatten::movies::MovieTable::Main,
//! );
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetcher`] - Chunking, fetch-with-retry and the paginated batch loader
//! - [`downloader`] - Timing constants and the request throttle
//! - [`query`] - Ordered query parameter templates
//! - [`presets`] - Field-selection presets for movie and person requests
//! - [`flatten`] - Raw record to flat row mapping
//! - [`output`] - JSON and CSV writers
//! - [`report`] - Missing-data reporting

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// CLI command implementations
pub mod cli;

/// Timing configuration and request throttling
pub mod downloader;

/// Chunking, fetching and pagination
pub mod fetcher;

/// Record flattening
pub mod flatten;

/// JSON and CSV output
pub mod output;

/// Request presets
pub mod presets;

/// Query parameter templates
pub mod query;

/// Missing-data reporting
pub mod report;

/// One raw movie or person object as returned by the API
pub type RawRecord = serde_json::Value;

/// A flattened record: column name to value, in insertion order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Opaque identifier of a movie or person in the upstream system
///
/// Identifiers are supplied by the caller and only ever rendered into the
/// query string, so numeric and textual forms are both accepted. Integral
/// floats (`326.0`, as written by dataframe exports) decode as numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric identifier (e.g., `326`)
    #[serde(deserialize_with = "integral_number")]
    Numeric(i64),
    /// Textual identifier
    Text(String),
}

fn integral_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(id) = number.as_i64() {
        return Ok(id);
    }
    match number.as_f64() {
        Some(id) if id.fract() == 0.0 && id.abs() < i64::MAX as f64 => Ok(id as i64),
        _ => Err(D::Error::custom(format!("{number} is not an integral identifier"))),
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(id) => write!(f, "{id}"),
            Identifier::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Identifier::Numeric(id)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Identifier::Text(id.to_string())
    }
}

/// Decoded result of one page request
///
/// `pages` is the total page count for the current chunk's filter and stays
/// stable across all page requests of that chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Records on this page, in API order
    pub docs: Vec<RawRecord>,
    /// Total number of pages for the current filter
    pub pages: u32,
}

impl PageResponse {
    /// Validate and decode a page from a raw JSON body
    pub fn from_value(value: serde_json::Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!("expected a JSON object, got: {value}"));
        }
        serde_json::from_value(value).map_err(|e| format!("malformed page response: {e}"))
    }
}
