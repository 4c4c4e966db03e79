//! Whole-file JSON persistence
//!
//! Files are UTF-8, indented with four spaces and keep non-ASCII characters
//! unescaped so Cyrillic titles stay readable.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::{debug, info};

use super::{OutputError, OutputResult};

const INDENT: &[u8] = b"    ";

/// Read and parse a whole JSON file
pub fn open_json<P: AsRef<Path>>(path: P) -> OutputResult<Value> {
    open_json_as(path)
}

/// Read a whole JSON file into a typed value
pub fn open_json_as<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> OutputResult<T> {
    let path = path.as_ref();
    debug!("Reading JSON file: path={}", path.display());

    let file = File::open(path).map_err(|e| {
        OutputError::IoError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        OutputError::SerializationError(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Serialize `data` into `path`, replacing any existing file
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, data: &T) -> OutputResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
    }

    let file = File::create(path)
        .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;
    let mut writer = BufWriter::new(file);

    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    data.serialize(&mut serializer)
        .map_err(|e| OutputError::SerializationError(e.to_string()))?;

    writer
        .flush()
        .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))?;

    info!("JSON written: path={}", path.display());
    Ok(())
}
