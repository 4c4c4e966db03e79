//! Report command implementation

use std::path::PathBuf;

use clap::Args;

use super::{CliError, OutputFormat};
use crate::report::MissingReport;

/// Arguments of the `report` command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// CSV file to inspect
    #[arg(long)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

impl ReportArgs {
    /// Build the report and render it in the requested format
    pub fn render(&self) -> Result<String, CliError> {
        let report = MissingReport::from_csv(&self.input)?;

        match self.format {
            OutputFormat::Human => Ok(report.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize report: {e}"))),
        }
    }

    /// Execute the report command, printing to stdout
    pub fn execute(&self) -> Result<(), CliError> {
        let rendered = self.render()?;
        print!("{rendered}");
        if self.format == OutputFormat::Json {
            println!();
        }
        Ok(())
    }
}
