//! Custom error types for the insight workspace core.
//!
//! Core computations (cleaning, statistics, chart series) never fail on data
//! shape; errors only come from the boundaries: file ingest, the remote query
//! backend, session preconditions and invalid user selections.
//!
//! Errors are serializable so a frontend can render them as toast messages.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the insight core.
#[derive(Error, Debug)]
pub enum InsightError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A row referenced a column outside the dataset's column list.
    #[error("Row {row} holds unknown column '{column}'")]
    UnknownColumn { row: usize, column: String },

    /// A column exists but is not a valid input for the requested chart.
    #[error("Column '{column}' cannot be used as {role} for a {chart}")]
    InvalidChartInput {
        column: String,
        role: String,
        chart: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Uploaded file has no data rows.
    #[error("File is empty")]
    EmptyDataset,

    /// Uploaded file has an extension the loader cannot parse.
    #[error("Unsupported file type '{0}'. Use CSV, Excel, or TXT.")]
    UnsupportedFileType(String),

    /// Spreadsheet could not be opened or read.
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// No data loaded in the session.
    #[error("No data loaded")]
    NoDataLoaded,

    /// No PDF loaded in the session.
    #[error("No PDF loaded")]
    NoPdfLoaded,

    /// A chat question was blank.
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// The remote query backend answered with a failure status.
    #[error("Backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error (only with the "backend" feature).
    #[cfg(feature = "backend")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightError>,
    },
}

impl From<calamine::Error> for InsightError {
    fn from(err: calamine::Error) -> Self {
        InsightError::Spreadsheet(err.to_string())
    }
}

impl InsightError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            Self::InvalidChartInput { .. } => "INVALID_CHART_INPUT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::NoPdfLoaded => "NO_PDF_LOADED",
            Self::EmptyQuestion => "EMPTY_QUESTION",
            Self::Backend { .. } => "BACKEND_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "backend")]
            Self::Http(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is recoverable by user action (upload, reselect, retype).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoDataLoaded
            | Self::NoPdfLoaded
            | Self::EmptyQuestion
            | Self::EmptyDataset
            | Self::UnsupportedFileType(_)
            | Self::InvalidChartInput { .. }
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for InsightError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for insight operations.
pub type Result<T> = std::result::Result<T, InsightError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightError::Polars(e).with_context(context))
    }
}
