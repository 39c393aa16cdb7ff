//! Delimited-text ingest through polars, and the reverse conversion for CSV export.

use crate::error::{InsightError, Result, ResultExt};
use crate::types::{Dataset, Value};
use polars::prelude::*;
use std::io::Cursor;
use tracing::{debug, warn};

/// Parse delimited bytes into a [`Dataset`].
///
/// A first attempt parses the bytes as-is. If polars rejects them, a second
/// attempt runs on content with blank lines and doubled quotes stripped.
pub(crate) fn read_delimited(bytes: &[u8], separator: u8) -> Result<Dataset> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(InsightError::EmptyDataset);
    }

    let df = match parse(bytes.to_vec(), separator) {
        Ok(df) => df,
        Err(e) => {
            debug!("Standard loading failed: {}", e);
            let cleaned = clean_csv_content(&String::from_utf8_lossy(bytes));
            parse(cleaned.into_bytes(), separator).context("Failed to parse delimited file")?
        }
    };

    if df.height() == 0 {
        return Err(InsightError::EmptyDataset);
    }
    dataframe_to_dataset(&df)
}

fn parse(bytes: Vec<u8>, separator: u8) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"')),
        )
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Strip blank lines and collapse doubled/tripled quotes.
pub(crate) fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Separator for a `.txt` file: tab when the header holds a tab and no comma.
pub(crate) fn sniff_separator(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    if header.contains(&b'\t') && !header.contains(&b',') {
        b'\t'
    } else {
        b','
    }
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Type a single text cell: anything that reads as a finite number becomes one.
fn typed_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    let looks_numeric = trimmed.bytes().any(|b| b.is_ascii_digit())
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'));

    match trimmed.parse::<f64>() {
        Ok(n) if looks_numeric && n.is_finite() => Value::Number(n),
        _ => Value::Text(raw.to_string()),
    }
}

/// Numeric columns become numbers, nulls stay null. Other dtypes are read as
/// text and typed cell by cell, so a column holding one stray token keeps
/// its numeric entries.
pub(crate) fn dataframe_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let mut columns: Vec<(String, Vec<Value>)> = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let name = series.name().to_string();

        let values: Vec<Value> = if is_numeric_dtype(series.dtype()) {
            let floats = series.cast(&DataType::Float64)?;
            floats.f64()?.into_iter().map(Value::from).collect()
        } else {
            let strings = series.cast(&DataType::String)?;
            strings
                .str()?
                .into_iter()
                .map(|v| v.map(typed_cell).unwrap_or(Value::Null))
                .collect()
        };
        columns.push((name, values));
    }

    Ok(Dataset::from_columns(columns))
}

/// Build a polars frame for export. Columns holding only numbers (and
/// nulls) become `Float64`; anything mixed is written as text.
pub(crate) fn dataset_to_dataframe(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .columns()
        .iter()
        .map(|name| {
            let all_numeric = dataset
                .column_values(name)
                .all(|v| matches!(v, Value::Number(_) | Value::Null));

            if all_numeric {
                let values: Vec<Option<f64>> =
                    dataset.column_values(name).map(Value::as_number).collect();
                Column::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<String>> = dataset
                    .column_values(name)
                    .map(|v| match v {
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect();
                Column::new(name.as_str().into(), values)
            }
        })
        .collect();

    DataFrame::new(columns).context("Failed to build export frame")
}

/// Write `dataset` as comma-separated text with a header row.
pub(crate) fn write_csv<W: std::io::Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    let mut df = dataset_to_dataframe(dataset)?;
    if df.width() == 0 {
        warn!("Exporting a dataset with no columns");
    }
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Failed to write CSV")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_delimited_types_and_nulls() {
        let ds = read_delimited(b"name,age\nAda,36\nBob,\n", b',').unwrap();
        assert_eq!(ds.columns(), &["name".to_string(), "age".to_string()]);
        assert_eq!(ds.rows()[0].get("age"), &Value::Number(36.0));
        assert_eq!(ds.rows()[1].get("age"), &Value::Null);
        assert_eq!(ds.rows()[1].get("name"), &Value::from("Bob"));
    }

    #[test]
    fn test_mixed_column_typed_per_cell() {
        let ds = read_delimited(b"v,name\n1,a\nn/a,b\n3,c\n,d\n", b',').unwrap();
        assert_eq!(ds.numeric_columns(), vec!["v".to_string()]);
        assert_eq!(ds.rows()[0].get("v"), &Value::Number(1.0));
        assert_eq!(ds.rows()[1].get("v"), &Value::from("n/a"));
        assert_eq!(ds.rows()[3].get("v"), &Value::Null);
        assert_eq!(ds.rows()[0].get("name"), &Value::from("a"));
    }

    #[test]
    fn test_typed_cell() {
        assert_eq!(typed_cell("2.5"), Value::Number(2.5));
        assert_eq!(typed_cell(" -3 "), Value::Number(-3.0));
        assert_eq!(typed_cell("1e3"), Value::Number(1000.0));
        assert_eq!(typed_cell("inf"), Value::from("inf"));
        assert_eq!(typed_cell("NaN"), Value::from("NaN"));
        assert_eq!(typed_cell("e"), Value::from("e"));
        assert_eq!(typed_cell("12abc"), Value::from("12abc"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = read_delimited(b"a,b\n", b',').unwrap_err();
        assert!(matches!(err, InsightError::EmptyDataset));
    }

    #[test]
    fn test_tab_separated() {
        let ds = read_delimited(b"x\ty\n1\ta\n2\tb\n", b'\t').unwrap();
        assert_eq!(ds.height(), 2);
        assert_eq!(ds.numeric_columns(), vec!["x".to_string()]);
    }

    #[test]
    fn test_sniff_separator() {
        assert_eq!(sniff_separator(b"a\tb\n1\t2"), b'\t');
        assert_eq!(sniff_separator(b"a,b\tc\n"), b',');
        assert_eq!(sniff_separator(b"single\n"), b',');
    }

    #[test]
    fn test_clean_csv_content() {
        let cleaned = clean_csv_content("a,b\n\n\"\"x\"\",1\n   \n");
        assert_eq!(cleaned, "a,b\n\"x\",1");
    }

    #[test]
    fn test_write_csv() {
        let ds = Dataset::from_columns(vec![
            ("n", vec![1.into(), Value::Null]),
            ("s", vec!["a".into(), 2.into()]),
        ]);
        let mut out = Vec::new();
        write_csv(&ds, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "n,s");
        assert!(lines[1].starts_with('1') && lines[1].ends_with(",a"));
        assert_eq!(lines[2], ",2");
    }
}
