//! Request and response bodies of the query service.

use serde::{Deserialize, Serialize};

/// One column of the uploaded table as the service describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Table schema returned after a dataset upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<SchemaColumn>,
    #[serde(default)]
    pub sample_rows: Vec<serde_json::Value>,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetUploadResponse {
    pub status: String,
    pub message: String,
    pub schema: TableSchema,
}

/// Result of a natural-language SQL question.
///
/// `status` is `"error"` when the generated query failed to run; the
/// service still answers 200 in that case and fills `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlAnswer {
    pub status: String,
    #[serde(default)]
    pub sql_query: String,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SqlAnswer {
    pub fn is_error(&self) -> bool {
        self.status == "error" || self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfUploadResponse {
    pub status: String,
    pub message: String,
    pub page_count: usize,
    /// Extracted characters.
    pub text_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfSummary {
    pub status: String,
    pub summary: String,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfAnswer {
    pub status: String,
    pub answer: String,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
    pub message: String,
}

/// JSON body for `/sql/query` and `/pdf/query`.
#[cfg_attr(not(feature = "backend"), allow(dead_code))]
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuestionRequest<'a> {
    pub session_id: &'a str,
    pub question: &'a str,
}

/// Error body the service sends with non-2xx statuses.
#[cfg_attr(not(feature = "backend"), allow(dead_code))]
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_column_type_field() {
        let col: SchemaColumn = serde_json::from_str(r#"{"name":"age","type":"INTEGER"}"#).unwrap();
        assert_eq!(col.data_type, "INTEGER");
    }

    #[test]
    fn test_sql_answer_defaults() {
        let answer: SqlAnswer =
            serde_json::from_str(r#"{"status":"error","error":"no such column"}"#).unwrap();
        assert!(answer.is_error());
        assert_eq!(answer.row_count, 0);
        assert!(answer.results.is_empty());
    }
}
