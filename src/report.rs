//! Missing-data reporting for flattened datasets

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::output::{collect_columns, OutputError, OutputResult};
use crate::Row;

/// Message rendered when no column has missing values
pub const NO_MISSING_MESSAGE: &str = "No missing values!";

/// Missing-value statistics of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingColumn {
    /// Column name
    pub column: String,
    /// Rows where the value is absent or empty
    pub missing: usize,
    /// Share of missing rows, in percent
    pub percent: f64,
}

impl MissingColumn {
    /// Percentage formatted with two decimals (e.g., "12.50%")
    pub fn percent_display(&self) -> String {
        format!("{:.2}%", self.percent)
    }
}

/// Columns with missing values, ordered by ascending missing count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingReport {
    /// Number of rows inspected
    pub total_rows: usize,
    /// Columns with at least one missing value
    pub columns: Vec<MissingColumn>,
}

impl MissingReport {
    /// Build a report over flattened rows
    ///
    /// A value counts as missing when the key is absent from the row or
    /// holds `null`. Columns are the union of all row keys.
    pub fn from_rows(rows: &[Row]) -> Self {
        let columns = collect_columns(rows);
        let total_rows = rows.len();

        let counts = columns.into_iter().map(|column| {
            let missing = rows
                .iter()
                .filter(|row| row.get(&column).map_or(true, Value::is_null))
                .count();
            (column, missing)
        });

        Self::from_counts(total_rows, counts)
    }

    /// Build a report over a CSV file; empty cells count as missing
    pub fn from_csv<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            OutputError::CsvError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| OutputError::CsvError(format!("Failed to read header: {}", e)))?
            .iter()
            .map(String::from)
            .collect();

        let mut missing = vec![0usize; headers.len()];
        let mut total_rows = 0;

        for record in reader.records() {
            let record =
                record.map_err(|e| OutputError::CsvError(format!("Failed to read row: {}", e)))?;
            total_rows += 1;
            for (index, count) in missing.iter_mut().enumerate() {
                if record.get(index).map_or(true, str::is_empty) {
                    *count += 1;
                }
            }
        }

        Ok(Self::from_counts(total_rows, headers.into_iter().zip(missing)))
    }

    fn from_counts(total_rows: usize, counts: impl Iterator<Item = (String, usize)>) -> Self {
        let mut columns: Vec<MissingColumn> = counts
            .filter(|(_, missing)| *missing > 0)
            .map(|(column, missing)| MissingColumn {
                column,
                missing,
                percent: missing as f64 / total_rows as f64 * 100.0,
            })
            .collect();

        // stable: ties keep column order
        columns.sort_by_key(|c| c.missing);

        Self {
            total_rows,
            columns,
        }
    }

    /// Whether every column is fully populated
    pub fn is_complete(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Display for MissingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            return writeln!(f, "{NO_MISSING_MESSAGE}");
        }

        let width = self
            .columns
            .iter()
            .map(|c| c.column.chars().count())
            .max()
            .unwrap_or(0)
            .max("column".len());

        writeln!(f, "{:<width$}  {:>8}  {:>8}", "column", "missing", "percent")?;
        for column in &self.columns {
            let pad = width - column.column.chars().count();
            writeln!(
                f,
                "{}{}  {:>8}  {:>8}",
                column.column,
                " ".repeat(pad),
                column.missing,
                column.percent_display()
            )?;
        }
        Ok(())
    }
}
