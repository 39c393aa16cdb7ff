//! Tabular store types: cell values, rows and datasets.
//!
//! A [`Dataset`] is an ordered list of column names plus an ordered list of
//! [`Row`]s. Rows are sparse maps; a column missing from a row reads as
//! [`Value::Null`]. Value types are heterogeneous per column, so a column is
//! classified as numeric as soon as one row holds a number in it.

use crate::error::{InsightError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

static NULL_VALUE: Value = Value::Null;

/// A single cell value.
///
/// Serializes untagged, so JSON rows look like `{"age": 31, "city": "Oslo", "note": null}`.
/// JSON booleans read as the text `"true"` / `"false"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawValue::deserialize(deserializer).map(Value::from)
    }
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Bool(b) => Value::Text(b.to_string()),
            RawValue::Number(n) => Value::Number(n),
            RawValue::Text(s) => Value::Text(s),
            RawValue::Null => Value::Null,
        }
    }
}

impl Value {
    /// Null and the empty string both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Number(_) => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Label used when the value acts as a group key (bar and pie charts, mode counting).
    ///
    /// Numbers print without a trailing `.0`, null prints as `null`.
    pub fn label(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Null => "null".to_string(),
        }
    }
}

/// Table-cell rendering: null renders as an empty cell.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Null => Ok(()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One record: column name to value. Absent keys read as null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(HashMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `column`, or null when the row has no entry for it.
    pub fn get(&self, column: &str) -> &Value {
        self.0.get(column).unwrap_or(&NULL_VALUE)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row(iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect())
    }
}

/// Classification of a column for cleaning and chart eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// At least one row holds a number.
    Numeric,
    /// Everything else.
    Categorical,
}

/// In-memory table derived from an uploaded file.
///
/// Datasets are never mutated in place by the cleaning engine; it returns a
/// new one. Deserializing goes through [`Dataset::new`], so JSON rows with
/// unlisted keys are rejected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = InsightError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset::new(raw.columns, raw.rows)
    }
}

impl Dataset {
    /// Create a dataset, checking that every row key is a listed column.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if let Some(unknown) = row.keys().find(|k| !columns.contains(k)) {
                return Err(InsightError::UnknownColumn {
                    row: idx,
                    column: unknown.clone(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Build a dataset column by column. Shorter columns are padded with nulls.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Self {
        let height = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let mut rows = vec![Row::new(); height];
        let mut names = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            let name = name.into();
            for (row, value) in rows.iter_mut().zip(values) {
                row.set(name.clone(), value);
            }
            names.push(name);
        }

        Self {
            columns: names,
            rows,
        }
    }

    /// Same columns, different rows. Rows come from this dataset so keys are already valid.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// All values of a column in row order (absent entries read as null).
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Numeric entries of a column in row order; non-numeric entries are skipped.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column_values(column)
            .filter_map(Value::as_number)
            .collect()
    }

    pub fn column_kind(&self, column: &str) -> ColumnKind {
        if self.column_values(column).any(Value::is_number) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Numeric columns in column-list order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.column_kind(c) == ColumnKind::Numeric)
            .cloned()
            .collect()
    }

    /// Categorical columns in column-list order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.column_kind(c) == ColumnKind::Categorical)
            .cloned()
            .collect()
    }

    /// Total number of missing cells over every listed column of every row.
    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .filter(|c| row.get(c).is_missing())
                    .count()
            })
            .sum()
    }

    /// First `n` rows, for table previews.
    pub fn preview(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Order-sensitive serialization of a row over the column list.
    ///
    /// Two rows are duplicates exactly when their keys are equal.
    pub fn row_key(&self, row: &Row) -> String {
        let values: Vec<&Value> = self.columns.iter().map(|c| row.get(c)).collect();
        // Serializing plain values and nulls cannot fail; fall back to Debug just in case.
        serde_json::to_string(&values).unwrap_or_else(|_| format!("{:?}", values))
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }
}
