//! Spreadsheet ingest (xlsx, xls, xlsm, ods) through calamine.

use crate::error::{InsightError, Result};
use crate::types::{Dataset, Row, Value};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

/// Read the first worksheet. The first row is the header.
pub(crate) fn read_spreadsheet(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InsightError::Spreadsheet("workbook has no sheets".to_string()))??;

    let mut rows_iter = range.rows();
    let Some(header) = rows_iter.next() else {
        return Err(InsightError::EmptyDataset);
    };
    let columns = header_names(header);

    let rows: Vec<Row> = rows_iter
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| {
            columns
                .iter()
                .zip(cells)
                .map(|(name, cell)| (name.clone(), cell_value(cell)))
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return Err(InsightError::EmptyDataset);
    }
    debug!(rows = rows.len(), columns = columns.len(), "Read worksheet");

    Dataset::new(columns, rows)
}

/// Header cells as column names. Blank headers get positional names and
/// repeated names get a numeric suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let base = match cell {
            Data::Empty => format!("column_{}", idx + 1),
            other => other.to_string().trim().to_string(),
        };
        let mut name = base.clone();
        let mut n = 2;
        while names.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Int(3)), Value::Number(3.0));
        assert_eq!(cell_value(&Data::Float(1.5)), Value::Number(1.5));
        assert_eq!(cell_value(&Data::Bool(true)), Value::from("true"));
        assert_eq!(cell_value(&Data::String("x".into())), Value::from("x"));
        assert_eq!(cell_value(&Data::Empty), Value::Null);
    }

    #[test]
    fn test_header_names() {
        let header = vec![
            Data::String("id".into()),
            Data::Empty,
            Data::String("id".into()),
        ];
        assert_eq!(header_names(&header), vec!["id", "column_2", "id_2"]);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = read_spreadsheet(b"not a workbook").unwrap_err();
        assert_eq!(err.error_code(), "SPREADSHEET_ERROR");
    }
}
