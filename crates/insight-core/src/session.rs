//! Per-user workspace state.
//!
//! A [`Session`] owns the currently loaded dataset, the SQL and PDF chat
//! histories and the dashboard counters. Every operation takes the session
//! explicitly; nothing is global.

use crate::backend::{QueryBackend, SqlAnswer, TableSchema};
use crate::cleaner::{Cleaner, CleaningReport};
use crate::config::CleaningConfig;
use crate::error::{InsightError, Result};
use crate::loader;
use crate::stats::{self, DatasetOverview, StatisticsTable};
use crate::types::{Dataset, Row};
use crate::viz::{self, ChartConfig, ChartKind, ChartSelection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Rows shown in the data preview table.
pub const PREVIEW_ROWS: usize = 20;

/// PDF names longer than this are truncated on the dashboard.
const PDF_NAME_MAX_CHARS: usize = 22;

const NOT_LOADED: &str = "Not loaded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum ChatContent {
    Text(String),
    /// Generated query, result rows and summary.
    Sql(SqlAnswer),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: ChatContent,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: ChatContent) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered messages of one chat panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    fn push(&mut self, role: ChatRole, content: ChatContent) {
        self.messages.push(ChatMessage::new(role, content));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// The dataset currently open in the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub file_name: String,
    pub dataset: Dataset,
}

/// The PDF currently open in the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfDocument {
    pub file_name: String,
    pub page_count: usize,
    pub text_length: usize,
}

/// Dashboard tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatus {
    /// `"N rows loaded"` or `"Not loaded"`.
    pub dataset_status: String,
    /// PDF file name (truncated) or `"Not loaded"`.
    pub pdf_status: String,
    pub query_count: usize,
    /// `"Just started"` or `"N min ago"`.
    pub session_age: String,
}

pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    dataset: Option<LoadedDataset>,
    schema: Option<TableSchema>,
    pdf: Option<PdfDocument>,
    sql_chat: ChatHistory,
    pdf_chat: ChatHistory,
    query_count: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            dataset: None,
            schema: None,
            pdf: None,
            sql_chat: ChatHistory::default(),
            pdf_chat: ChatHistory::default(),
            query_count: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn query_count(&self) -> usize {
        self.query_count
    }

    pub fn sql_chat(&self) -> &ChatHistory {
        &self.sql_chat
    }

    pub fn pdf_chat(&self) -> &ChatHistory {
        &self.pdf_chat
    }

    /// Schema of the table the backend built from the last upload.
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    pub fn pdf(&self) -> Option<&PdfDocument> {
        self.pdf.as_ref()
    }

    pub fn loaded(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .map(|d| &d.dataset)
            .ok_or(InsightError::NoDataLoaded)
    }

    // =========================================================================
    // Data cleaning and visualization
    // =========================================================================

    /// Replace the current dataset. Any prior dataset is discarded.
    pub fn load_dataset(&mut self, file_name: impl Into<String>, dataset: Dataset) {
        let file_name = file_name.into();
        info!(
            session = %self.id,
            file = %file_name,
            rows = dataset.height(),
            "Dataset loaded into session"
        );
        self.dataset = Some(LoadedDataset { file_name, dataset });
    }

    /// Clean the current dataset in place and report what changed.
    pub fn apply_cleaning(&mut self, config: &CleaningConfig) -> Result<CleaningReport> {
        let loaded = self.dataset.as_mut().ok_or(InsightError::NoDataLoaded)?;
        let (cleaned, report) = Cleaner::clean_with_report(&loaded.dataset, config);
        loaded.dataset = cleaned;
        Ok(report)
    }

    pub fn summary(&self) -> Result<StatisticsTable> {
        Ok(stats::summarize(self.dataset()?))
    }

    pub fn overview(&self) -> Result<DatasetOverview> {
        Ok(DatasetOverview::of(self.dataset()?))
    }

    /// First [`PREVIEW_ROWS`] rows of the current dataset.
    pub fn preview(&self) -> Result<&[Row]> {
        Ok(self.dataset()?.preview(PREVIEW_ROWS))
    }

    pub fn chart(&self, kind: ChartKind, selection: &ChartSelection) -> Result<ChartConfig> {
        viz::configure(self.dataset()?, kind, selection)
    }

    // =========================================================================
    // SQL assistant
    // =========================================================================

    /// Parse an uploaded file locally, keep it as the current dataset and
    /// hand the raw bytes to the backend for SQL questions.
    ///
    /// The dataset stays loaded even if the backend rejects the upload.
    pub fn upload_dataset(
        &mut self,
        backend: &dyn QueryBackend,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<TableSchema> {
        let dataset = loader::load_bytes(file_name, bytes)?;
        self.load_dataset(file_name, dataset);

        let response = backend.upload_dataset(&self.id.to_string(), file_name, bytes)?;
        info!(
            backend = backend.name(),
            table = %response.schema.table_name,
            "{}",
            response.message
        );
        self.schema = Some(response.schema.clone());
        Ok(response.schema)
    }

    /// Ask a natural-language question about the uploaded table.
    pub fn ask_sql(&mut self, backend: &dyn QueryBackend, question: &str) -> Result<SqlAnswer> {
        let question = validate_question(question)?;
        self.sql_chat
            .push(ChatRole::User, ChatContent::Text(question.to_string()));

        match backend.query_sql(&self.id.to_string(), question) {
            Ok(answer) => {
                self.sql_chat
                    .push(ChatRole::Assistant, ChatContent::Sql(answer.clone()));
                self.query_count += 1;
                Ok(answer)
            }
            Err(e) => {
                self.sql_chat.push(ChatRole::Assistant, error_content(&e));
                Err(e)
            }
        }
    }

    pub fn clear_sql_chat(&mut self) {
        self.sql_chat.clear();
    }

    // =========================================================================
    // PDF assistant
    // =========================================================================

    pub fn upload_pdf(
        &mut self,
        backend: &dyn QueryBackend,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PdfDocument> {
        let response = backend.upload_pdf(&self.id.to_string(), file_name, bytes)?;
        info!(backend = backend.name(), "{}", response.message);

        let doc = PdfDocument {
            file_name: file_name.to_string(),
            page_count: response.page_count,
            text_length: response.text_length,
        };
        self.pdf = Some(doc.clone());
        Ok(doc)
    }

    /// Ask the backend for a summary of the uploaded PDF. The summary is
    /// appended to the PDF chat.
    pub fn summarize_pdf(&mut self, backend: &dyn QueryBackend) -> Result<String> {
        if self.pdf.is_none() {
            return Err(InsightError::NoPdfLoaded);
        }
        let summary = backend.summarize_pdf(&self.id.to_string())?;
        self.pdf_chat
            .push(ChatRole::Assistant, ChatContent::Text(summary.summary.clone()));
        self.query_count += 1;
        Ok(summary.summary)
    }

    pub fn ask_pdf(&mut self, backend: &dyn QueryBackend, question: &str) -> Result<String> {
        let question = validate_question(question)?;
        self.pdf_chat
            .push(ChatRole::User, ChatContent::Text(question.to_string()));

        match backend.query_pdf(&self.id.to_string(), question) {
            Ok(answer) => {
                self.pdf_chat
                    .push(ChatRole::Assistant, ChatContent::Text(answer.answer.clone()));
                self.query_count += 1;
                Ok(answer.answer)
            }
            Err(e) => {
                self.pdf_chat.push(ChatRole::Assistant, error_content(&e));
                Err(e)
            }
        }
    }

    pub fn clear_pdf_chat(&mut self) {
        self.pdf_chat.clear();
    }

    // =========================================================================
    // Dashboard and lifecycle
    // =========================================================================

    pub fn dashboard(&self) -> DashboardStatus {
        self.dashboard_at(Utc::now())
    }

    /// Dashboard as of `now`.
    pub fn dashboard_at(&self, now: DateTime<Utc>) -> DashboardStatus {
        let dataset_status = match &self.dataset {
            Some(loaded) => format!("{} rows loaded", loaded.dataset.height()),
            None => NOT_LOADED.to_string(),
        };
        let pdf_status = match &self.pdf {
            Some(doc) => truncate_name(&doc.file_name),
            None => NOT_LOADED.to_string(),
        };
        let minutes = (now - self.started_at).num_minutes();
        let session_age = if minutes < 1 {
            "Just started".to_string()
        } else {
            format!("{} min ago", minutes)
        };

        DashboardStatus {
            dataset_status,
            pdf_status,
            query_count: self.query_count,
            session_age,
        }
    }

    /// Ask the backend to drop this session's data, then start over with a
    /// fresh id. A backend failure is logged and does not stop the reset.
    pub fn end(&mut self, backend: &dyn QueryBackend) {
        if let Err(e) = backend.end_session(&self.id.to_string()) {
            warn!(session = %self.id, "Failed to clean up backend session: {}", e);
        }
        *self = Session::new();
    }
}

fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(InsightError::EmptyQuestion);
    }
    Ok(trimmed)
}

fn error_content(err: &InsightError) -> ChatContent {
    match err {
        InsightError::Backend { detail, .. } => ChatContent::Error(format!("Error: {}", detail)),
        other => ChatContent::Error(format!("Network error: {}", other)),
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > PDF_NAME_MAX_CHARS {
        let head: String = name.chars().take(PDF_NAME_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        DatasetUploadResponse, PdfAnswer, PdfSummary, PdfUploadResponse, SchemaColumn,
        StatusMessage,
    };
    use crate::config::NumericPolicy;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// In-memory backend that records calls and can be told to fail.
    #[derive(Default)]
    struct FakeBackend {
        fail_with: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn failing(detail: &str) -> Self {
            Self {
                fail_with: Some(detail.to_string()),
                ..Default::default()
            }
        }

        fn record(&self, call: &str) -> Result<()> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call.to_string());
            }
            match &self.fail_with {
                Some(detail) => Err(InsightError::Backend {
                    status: 400,
                    detail: detail.clone(),
                }),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl QueryBackend for FakeBackend {
        fn upload_dataset(&self, _: &str, file_name: &str, _: &[u8]) -> Result<DatasetUploadResponse> {
            self.record("upload_dataset")?;
            Ok(DatasetUploadResponse {
                status: "success".into(),
                message: "loaded".into(),
                schema: TableSchema {
                    table_name: file_name.trim_end_matches(".csv").into(),
                    columns: vec![SchemaColumn {
                        name: "a".into(),
                        data_type: "INTEGER".into(),
                    }],
                    sample_rows: vec![],
                    row_count: 2,
                },
            })
        }

        fn query_sql(&self, _: &str, question: &str) -> Result<SqlAnswer> {
            self.record("query_sql")?;
            Ok(SqlAnswer {
                status: "success".into(),
                sql_query: format!("-- {}", question),
                results: vec![],
                columns: vec![],
                row_count: 0,
                ai_summary: None,
                error: None,
            })
        }

        fn upload_pdf(&self, _: &str, _: &str, _: &[u8]) -> Result<PdfUploadResponse> {
            self.record("upload_pdf")?;
            Ok(PdfUploadResponse {
                status: "success".into(),
                message: "processed".into(),
                page_count: 3,
                text_length: 1200,
            })
        }

        fn summarize_pdf(&self, _: &str) -> Result<PdfSummary> {
            self.record("summarize_pdf")?;
            Ok(PdfSummary {
                status: "success".into(),
                summary: "A short report.".into(),
                source_file: "r.pdf".into(),
            })
        }

        fn query_pdf(&self, _: &str, _: &str) -> Result<PdfAnswer> {
            self.record("query_pdf")?;
            Ok(PdfAnswer {
                status: "success".into(),
                answer: "Page 2.".into(),
                source_file: "r.pdf".into(),
            })
        }

        fn end_session(&self, _: &str) -> Result<StatusMessage> {
            self.record("end_session")?;
            Ok(StatusMessage {
                status: "success".into(),
                message: "Session cleaned up.".into(),
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn numbers() -> Dataset {
        Dataset::from_columns(vec![("a", vec![1.into(), crate::types::Value::Null])])
    }

    // =========================================================================
    // Dataset operations
    // =========================================================================

    #[test]
    fn test_operations_before_load_fail() {
        let mut session = Session::new();
        assert!(matches!(session.summary(), Err(InsightError::NoDataLoaded)));
        assert!(matches!(session.overview(), Err(InsightError::NoDataLoaded)));
        assert!(matches!(
            session.chart(ChartKind::Histogram, &ChartSelection::new()),
            Err(InsightError::NoDataLoaded)
        ));
        assert!(matches!(
            session.apply_cleaning(&CleaningConfig::default()),
            Err(InsightError::NoDataLoaded)
        ));
    }

    #[test]
    fn test_apply_cleaning_replaces_dataset() {
        let mut session = Session::new();
        session.load_dataset("a.csv", numbers());

        let config = CleaningConfig::builder()
            .numeric(NumericPolicy::FillZero)
            .build();
        let report = session.apply_cleaning(&config).unwrap();

        assert_eq!(report.cells_filled(), 1);
        assert_eq!(session.overview().unwrap().missing, 0);
    }

    #[test]
    fn test_load_replaces_prior_dataset() {
        let mut session = Session::new();
        session.load_dataset("a.csv", numbers());
        session.load_dataset("b.csv", Dataset::default());
        assert_eq!(session.loaded().unwrap().file_name, "b.csv");
        assert!(session.preview().unwrap().is_empty());
    }

    #[test]
    fn test_upload_dataset_stores_schema() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        let schema = session
            .upload_dataset(&backend, "sales.csv", b"a\n1\n2\n")
            .unwrap();

        assert_eq!(schema.table_name, "sales");
        assert_eq!(session.dataset().unwrap().height(), 2);
        assert_eq!(session.schema(), Some(&schema));
    }

    #[test]
    fn test_upload_empty_file_skips_backend() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        let err = session.upload_dataset(&backend, "e.csv", b"").unwrap_err();
        assert!(matches!(err, InsightError::EmptyDataset));
        assert!(backend.calls().is_empty());
    }

    // =========================================================================
    // Chats
    // =========================================================================

    #[test]
    fn test_ask_sql_records_chat_and_counts() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        let answer = session.ask_sql(&backend, "  total units?  ").unwrap();

        assert_eq!(answer.sql_query, "-- total units?");
        assert_eq!(session.sql_chat().len(), 2);
        assert_eq!(session.query_count(), 1);
        assert_eq!(
            session.sql_chat().messages()[0].content,
            ChatContent::Text("total units?".into())
        );
    }

    #[test]
    fn test_empty_question_rejected_before_call() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        assert!(matches!(
            session.ask_sql(&backend, "   "),
            Err(InsightError::EmptyQuestion)
        ));
        assert!(matches!(
            session.ask_pdf(&backend, ""),
            Err(InsightError::EmptyQuestion)
        ));
        assert!(backend.calls().is_empty());
        assert!(session.sql_chat().is_empty());
    }

    #[test]
    fn test_backend_error_recorded_in_chat() {
        let backend = FakeBackend::failing("No data loaded. Please upload a file first.");
        let mut session = Session::new();
        let err = session.ask_sql(&backend, "anything").unwrap_err();

        assert_eq!(err.error_code(), "BACKEND_ERROR");
        assert_eq!(session.query_count(), 0);
        assert_eq!(
            session.sql_chat().last().unwrap().content,
            ChatContent::Error("Error: No data loaded. Please upload a file first.".into())
        );
    }

    #[test]
    fn test_pdf_flow() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        assert!(matches!(
            session.summarize_pdf(&backend),
            Err(InsightError::NoPdfLoaded)
        ));

        let doc = session.upload_pdf(&backend, "report.pdf", b"%PDF").unwrap();
        assert_eq!(doc.page_count, 3);

        assert_eq!(session.summarize_pdf(&backend).unwrap(), "A short report.");
        assert_eq!(session.ask_pdf(&backend, "where?").unwrap(), "Page 2.");
        assert_eq!(session.pdf_chat().len(), 3);
        assert_eq!(session.query_count(), 2);

        session.clear_pdf_chat();
        assert!(session.pdf_chat().is_empty());
        assert_eq!(session.query_count(), 2);
    }

    // =========================================================================
    // Dashboard and lifecycle
    // =========================================================================

    #[test]
    fn test_dashboard() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        let fresh = session.dashboard_at(session.started_at());
        assert_eq!(fresh.dataset_status, "Not loaded");
        assert_eq!(fresh.pdf_status, "Not loaded");
        assert_eq!(fresh.session_age, "Just started");

        session.load_dataset("a.csv", numbers());
        session
            .upload_pdf(&backend, "quarterly_financial_report_2024.pdf", b"%PDF")
            .unwrap();

        let later = session.dashboard_at(session.started_at() + Duration::minutes(7));
        assert_eq!(later.dataset_status, "2 rows loaded");
        assert_eq!(later.pdf_status, "quarterly_financial_re...");
        assert_eq!(later.session_age, "7 min ago");
    }

    #[test]
    fn test_end_resets_with_new_id() {
        let backend = FakeBackend::failing("gone");
        let mut session = Session::new();
        let old_id = session.id();
        session.load_dataset("a.csv", numbers());

        session.end(&backend);

        assert_ne!(session.id(), old_id);
        assert!(session.loaded().is_none());
        assert_eq!(backend.calls(), vec!["end_session".to_string()]);
    }
}
