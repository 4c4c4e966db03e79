//! CSV output writer for flattened rows

use csv::Writer;
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{collect_columns, OutputError, OutputResult, OutputWriter, RowsWriter};
use crate::Row;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// Render one cell
///
/// `null` becomes an empty cell, strings are written verbatim, numbers and
/// booleans use their JSON text and lists/objects are written as compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// CSV writer with a fixed column set
///
/// Rows lacking a column get an empty cell; keys outside the column set are
/// ignored.
pub struct CsvRowsWriter {
    writer: Writer<BufWriter<File>>,
    columns: Vec<String>,
    rows_written: u64,
}

impl CsvRowsWriter {
    /// Create a writer and emit the header line
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `columns` - Header, in column order
    pub fn new<P: AsRef<Path>>(path: P, columns: Vec<String>) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, columns, DEFAULT_BUFFER_SIZE)
    }

    /// Create a writer with a custom buffer size
    pub fn new_with_buffer_size<P: AsRef<Path>>(
        path: P,
        columns: Vec<String>,
        buffer_size: usize,
    ) -> OutputResult<Self> {
        let path = path.as_ref();
        info!(
            "Creating CSV writer: path={}, columns={}",
            path.display(),
            columns.len()
        );

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        let buf_writer = BufWriter::with_capacity(buffer_size, file);
        let mut writer = Writer::from_writer(buf_writer);

        if !columns.is_empty() {
            writer
                .write_record(&columns)
                .map_err(|e| OutputError::CsvError(format!("Failed to write header: {}", e)))?;
        }

        Ok(Self {
            writer,
            columns,
            rows_written: 0,
        })
    }

    /// Write all `rows` to `path`, deriving the header from the rows themselves
    pub fn write_all<P: AsRef<Path>>(path: P, rows: &[Row]) -> OutputResult<u64> {
        let mut writer = Self::new(path, collect_columns(rows))?;
        writer.write_rows(rows)?;
        let written = writer.rows_written();
        writer.close()?;
        Ok(written)
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Header columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl RowsWriter for CsvRowsWriter {
    fn write_row(&mut self, row: &Row) -> OutputResult<()> {
        let record: Vec<String> = self
            .columns
            .iter()
            .map(|column| row.get(column).map(cell_text).unwrap_or_default())
            .collect();

        self.writer
            .write_record(&record)
            .map_err(|e| OutputError::CsvError(format!("Failed to write row: {}", e)))?;

        self.rows_written += 1;

        // Flush periodically (every 1000 rows)
        if self.rows_written % 1000 == 0 {
            self.flush()?;
            debug!("Progress: {} rows written", self.rows_written);
        }

        Ok(())
    }
}

impl OutputWriter for CsvRowsWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))
    }

    fn close(mut self) -> OutputResult<()> {
        debug!("Closing CSV writer: {} total rows written", self.rows_written);

        self.flush()?;

        let buf_writer = self.writer.into_inner().map_err(|e| {
            OutputError::IoError(format!("Failed to get inner writer: {}", e))
        })?;

        let file = buf_writer.into_inner().map_err(|e| {
            OutputError::IoError(format!("Failed to get file handle: {}", e))
        })?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        info!("CSV writer closed successfully: {} rows written", self.rows_written);
        Ok(())
    }
}
