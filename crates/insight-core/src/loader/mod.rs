//! File ingest: turns uploaded CSV, TXT or spreadsheet bytes into a [`Dataset`].
//!
//! The file kind is picked from the extension. Delimited text goes through
//! polars, spreadsheets through calamine. Both produce the same cell model:
//! numbers, text and nulls.

mod csv;
mod excel;

use crate::error::{InsightError, Result, ResultExt};
use crate::types::Dataset;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    /// Delimited text; tab- or comma-separated depending on the header.
    Text,
    Spreadsheet,
}

impl FileKind {
    /// Detect the kind from a file name's extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Text),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(InsightError::UnsupportedFileType(file_name.to_string())),
        }
    }
}

/// Parse an uploaded file's bytes.
///
/// # Errors
///
/// - [`InsightError::UnsupportedFileType`] for unknown extensions.
/// - [`InsightError::EmptyDataset`] when the file has no data rows.
pub fn load_bytes(file_name: &str, bytes: &[u8]) -> Result<Dataset> {
    let kind = FileKind::from_file_name(file_name)?;

    let dataset = match kind {
        FileKind::Csv => csv::read_delimited(bytes, b',')?,
        FileKind::Text => csv::read_delimited(bytes, csv::sniff_separator(bytes))?,
        FileKind::Spreadsheet => excel::read_spreadsheet(bytes)?,
    };

    info!(
        file = file_name,
        rows = dataset.height(),
        columns = dataset.width(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Read and parse a file from disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(InsightError::from)
        .context(format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    load_bytes(file_name, &bytes)
}

/// Write a dataset to `path` as CSV with a header row.
pub fn save_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    csv::write_csv(dataset, &mut writer)?;
    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Render a dataset as CSV text.
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    csv::write_csv(dataset, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
