//! Remote query service for SQL and PDF questions.
//!
//! The [`QueryBackend`] trait is always available so callers and tests can
//! plug in their own implementation. The HTTP client [`HttpBackend`]
//! requires the `backend` feature (on by default).
//!
//! ```toml
//! # Without the HTTP client
//! insight-core = { version = "0.1", default-features = false }
//! ```

mod types;

#[cfg(feature = "backend")]
mod http;

#[cfg(feature = "backend")]
pub use http::{HttpBackend, HttpBackendConfig, HttpBackendConfigBuilder};

pub use types::{
    DatasetUploadResponse, PdfAnswer, PdfSummary, PdfUploadResponse, SchemaColumn, SqlAnswer,
    StatusMessage, TableSchema,
};

use crate::error::Result;

/// Service that stores uploaded files per session and answers questions about them.
///
/// Implementations must be `Send + Sync`.
pub trait QueryBackend: Send + Sync {
    /// Load a tabular file into the session's SQL table.
    fn upload_dataset(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<DatasetUploadResponse>;

    /// Answer a natural-language question with a generated SQL query.
    fn query_sql(&self, session_id: &str, question: &str) -> Result<SqlAnswer>;

    /// Extract text from a PDF for later questions.
    fn upload_pdf(&self, session_id: &str, file_name: &str, bytes: &[u8])
    -> Result<PdfUploadResponse>;

    fn summarize_pdf(&self, session_id: &str) -> Result<PdfSummary>;

    fn query_pdf(&self, session_id: &str, question: &str) -> Result<PdfAnswer>;

    /// Drop everything the service holds for the session.
    fn end_session(&self, session_id: &str) -> Result<StatusMessage>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
