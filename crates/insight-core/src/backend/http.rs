//! Blocking HTTP client for the query service.

use super::QueryBackend;
use super::types::{
    DatasetUploadResponse, ErrorBody, PdfAnswer, PdfSummary, PdfUploadResponse, QuestionRequest,
    SqlAnswer, StatusMessage,
};
use crate::error::{InsightError, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default service address.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default timeout for requests in seconds. Model-backed answers can be slow.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Service root, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpBackendConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HttpBackendConfigBuilder {
        HttpBackendConfigBuilder::default()
    }
}

/// Builder for [`HttpBackendConfig`].
#[derive(Default)]
pub struct HttpBackendConfigBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpBackendConfigBuilder {
    /// Set the service root URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`QueryBackend`] over HTTP.
///
/// # Example
///
/// ```rust,ignore
/// use insight_core::backend::{HttpBackend, HttpBackendConfig};
///
/// let config = HttpBackendConfig::builder()
///     .base_url("http://localhost:8000")
///     .build();
/// let backend = HttpBackend::with_config(config)?;
/// ```
pub struct HttpBackend {
    config: HttpBackendConfig,
    client: Client,
}

impl HttpBackend {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(HttpBackendConfig::default())
    }

    /// Create a client with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: HttpBackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn file_form(session_id: &str, file_name: &str, bytes: &[u8]) -> Form {
        Form::new()
            .text("session_id", session_id.to_string())
            .part(
                "file",
                Part::bytes(bytes.to_vec()).file_name(file_name.to_string()),
            )
    }

    /// Send a request and decode the JSON body, mapping failure statuses to
    /// [`InsightError::Backend`] with the service's `detail` text.
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T> {
        debug!(path, "Calling query backend");
        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text()?;
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or(text);
            warn!(path, status = status.as_u16(), "Query backend error: {}", detail);
            return Err(InsightError::Backend {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json()?)
    }
}

impl QueryBackend for HttpBackend {
    fn upload_dataset(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<DatasetUploadResponse> {
        let path = "/sql/upload";
        let request = self
            .client
            .post(self.url(path))
            .multipart(Self::file_form(session_id, file_name, bytes));
        self.send(request, path)
    }

    fn query_sql(&self, session_id: &str, question: &str) -> Result<SqlAnswer> {
        let path = "/sql/query";
        let request = self.client.post(self.url(path)).json(&QuestionRequest {
            session_id,
            question,
        });
        self.send(request, path)
    }

    fn upload_pdf(
        &self,
        session_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PdfUploadResponse> {
        let path = "/pdf/upload";
        let request = self
            .client
            .post(self.url(path))
            .multipart(Self::file_form(session_id, file_name, bytes));
        self.send(request, path)
    }

    fn summarize_pdf(&self, session_id: &str) -> Result<PdfSummary> {
        let path = "/pdf/summarize";
        let request = self
            .client
            .post(self.url(path))
            .form(&[("session_id", session_id)]);
        self.send(request, path)
    }

    fn query_pdf(&self, session_id: &str, question: &str) -> Result<PdfAnswer> {
        let path = "/pdf/query";
        let request = self.client.post(self.url(path)).json(&QuestionRequest {
            session_id,
            question,
        });
        self.send(request, path)
    }

    fn end_session(&self, session_id: &str) -> Result<StatusMessage> {
        let path = format!("/session/{}", session_id);
        let request = self.client.delete(self.url(&path));
        self.send(request, &path)
    }

    fn name(&self) -> &str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn backend_for(server: &mockito::ServerGuard) -> HttpBackend {
        let config = HttpBackendConfig::builder()
            .base_url(server.url())
            .timeout_secs(5)
            .build();
        HttpBackend::with_config(config).unwrap()
    }

    // =========================================================================
    // Config
    // =========================================================================

    #[test]
    fn test_config_defaults() {
        let config = HttpBackendConfig::builder().build();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = HttpBackendConfig::builder()
            .base_url("http://svc:9000/")
            .build();
        assert_eq!(config.base_url, "http://svc:9000");
    }

    // =========================================================================
    // Requests
    // =========================================================================

    #[test]
    fn test_query_sql() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/sql/query")
            .match_body(Matcher::Json(json!({
                "session_id": "s1",
                "question": "how many rows?"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "success",
                    "sql_query": "SELECT COUNT(*) FROM t",
                    "results": [{"n": 3}],
                    "columns": ["n"],
                    "row_count": 1,
                    "ai_summary": "There are 3 rows.",
                    "error": null
                })
                .to_string(),
            )
            .create();

        let answer = backend_for(&server).query_sql("s1", "how many rows?").unwrap();
        mock.assert();
        assert_eq!(answer.sql_query, "SELECT COUNT(*) FROM t");
        assert_eq!(answer.columns, vec!["n".to_string()]);
        assert_eq!(answer.ai_summary.as_deref(), Some("There are 3 rows."));
        assert!(!answer.is_error());
    }

    #[test]
    fn test_upload_dataset_multipart() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/sql/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="session_id""#.to_string()),
                Matcher::Regex(r#"filename="sales.csv""#.to_string()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "status": "success",
                    "message": "Data loaded into table 'sales'",
                    "schema": {
                        "table_name": "sales",
                        "columns": [{"name": "units", "type": "INTEGER"}],
                        "sample_rows": [{"units": 1}],
                        "row_count": 1
                    }
                })
                .to_string(),
            )
            .create();

        let resp = backend_for(&server)
            .upload_dataset("s1", "sales.csv", b"units\n1\n")
            .unwrap();
        mock.assert();
        assert_eq!(resp.schema.table_name, "sales");
        assert_eq!(resp.schema.columns[0].data_type, "INTEGER");
    }

    #[test]
    fn test_summarize_pdf_form() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/pdf/summarize")
            .match_body(Matcher::UrlEncoded("session_id".into(), "s1".into()))
            .with_status(200)
            .with_body(r#"{"status":"success","summary":"Short.","source_file":"a.pdf"}"#)
            .create();

        let summary = backend_for(&server).summarize_pdf("s1").unwrap();
        mock.assert();
        assert_eq!(summary.summary, "Short.");
    }

    #[test]
    fn test_end_session() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/session/s1")
            .with_status(200)
            .with_body(r#"{"status":"success","message":"Session cleaned up."}"#)
            .create();

        let resp = backend_for(&server).end_session("s1").unwrap();
        mock.assert();
        assert_eq!(resp.message, "Session cleaned up.");
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_error_detail_is_mapped() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/pdf/query")
            .with_status(400)
            .with_body(r#"{"detail":"No PDF loaded. Please upload a PDF first."}"#)
            .create();

        let err = backend_for(&server).query_pdf("s1", "what?").unwrap_err();
        match err {
            InsightError::Backend { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "No PDF loaded. Please upload a PDF first.");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_error_without_json_keeps_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/sql/query")
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        let err = backend_for(&server).query_sql("s1", "q").unwrap_err();
        assert_eq!(err.to_string(), "Backend error (500): Internal Server Error");
    }
}
