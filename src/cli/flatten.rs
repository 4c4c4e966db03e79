//! Flatten command implementation

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use tracing::info;

use super::CliError;
use crate::flatten::movies::{flatten_movies, MovieTable};
use crate::flatten::persons::flatten_person_movies;
use crate::output::csv::CsvRowsWriter;
use crate::output::json::{open_json, save_json};
use crate::{RawRecord, Row};

/// Record kinds that can be flattened
#[derive(Subcommand, Debug)]
pub enum FlattenCommand {
    /// Flatten movie records into one row per movie
    Movies {
        /// Shared input/output arguments
        #[command(flatten)]
        io: FlattenIo,

        /// Column set to produce
        #[arg(long, value_enum, default_value_t = MovieTable::Main)]
        table: MovieTable,
    },

    /// Flatten person records into one row per (person, movie) pair
    Persons {
        /// Shared input/output arguments
        #[command(flatten)]
        io: FlattenIo,
    },
}

/// Input and output paths of a flatten run
#[derive(Args, Debug)]
pub struct FlattenIo {
    /// Raw JSON file (array of records) produced by `fetch`
    #[arg(long)]
    pub input: PathBuf,

    /// CSV output path
    #[arg(long)]
    pub output: PathBuf,

    /// Also write the flattened rows as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Read a raw JSON file holding an array of records
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, CliError> {
    match open_json(path)? {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(CliError::InvalidArgument(format!(
            "{} must hold a JSON array of records, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl FlattenCommand {
    /// Execute the flatten command
    pub fn execute(&self) -> Result<(), CliError> {
        let (io, rows) = match self {
            FlattenCommand::Movies { io, table } => {
                let records = read_records(&io.input)?;
                info!("Flattening {} movie records ({:?} table)", records.len(), table);
                (io, flatten_movies(&records, *table))
            }
            FlattenCommand::Persons { io } => {
                let records = read_records(&io.input)?;
                info!("Flattening {} person records", records.len());
                (io, flatten_person_movies(&records))
            }
        };

        write_rows(io, &rows)
    }
}

fn write_rows(io: &FlattenIo, rows: &[Row]) -> Result<(), CliError> {
    let written = CsvRowsWriter::write_all(&io.output, rows)?;
    info!("Wrote {} rows to {}", written, io.output.display());

    if let Some(json_path) = &io.json {
        save_json(json_path, rows)?;
        info!("Wrote {} rows to {}", rows.len(), json_path.display());
    }
    Ok(())
}
