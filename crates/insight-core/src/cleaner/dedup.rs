//! Duplicate row removal.

use crate::types::{Dataset, Row};
use std::collections::HashSet;

/// Keep the first occurrence of every distinct row, preserving order.
///
/// Rows are compared through [`Dataset::row_key`], so an absent key and an
/// explicit null are the same cell.
pub(crate) fn remove_duplicates(dataset: &Dataset, rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(dataset.row_key(row)))
        .collect()
}

/// Number of rows that [`remove_duplicates`] would drop.
pub fn count_duplicates(dataset: &Dataset) -> usize {
    let mut seen = HashSet::with_capacity(dataset.height());
    dataset
        .rows()
        .iter()
        .filter(|row| !seen.insert(dataset.row_key(row)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            ("a", vec![1.into(), 2.into(), 1.into(), 1.into()]),
            ("b", vec!["x".into(), "y".into(), "x".into(), "z".into()]),
        ])
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let ds = dataset();
        let rows = remove_duplicates(&ds, ds.rows().to_vec());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("b"), &Value::from("x"));
        assert_eq!(rows[1].get("b"), &Value::from("y"));
        assert_eq!(rows[2].get("b"), &Value::from("z"));
    }

    #[test]
    fn test_count_duplicates() {
        assert_eq!(count_duplicates(&dataset()), 1);
        assert_eq!(count_duplicates(&Dataset::default()), 0);
    }

    #[test]
    fn test_absent_key_equals_null() {
        let mut sparse = Row::new();
        sparse.set("a", 1);
        let mut explicit = Row::new();
        explicit.set("a", 1);
        explicit.set("b", Value::Null);

        let ds = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![sparse, explicit],
        )
        .unwrap();
        assert_eq!(count_duplicates(&ds), 1);
    }
}
