//! Series builders for the individual chart kinds.

use super::Point;
use crate::types::Dataset;
use crate::utils::FrequencyTable;
use std::collections::HashMap;

/// Numeric entries of one column (histogram, box plot).
pub(crate) fn column_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset.numeric_values(column)
}

/// `(x, y)` per row, in row order. Non-numeric entries become `None`.
pub(crate) fn paired_points(dataset: &Dataset, x: &str, y: &str) -> Vec<Point> {
    dataset
        .rows()
        .iter()
        .map(|row| Point {
            x: row.get(x).as_number(),
            y: row.get(y).as_number(),
        })
        .collect()
}

/// Paired points sorted ascending by x; a missing x sorts as 0. Stable.
pub(crate) fn line_points(dataset: &Dataset, x: &str, y: &str) -> Vec<Point> {
    let mut points = paired_points(dataset, x, y);
    points.sort_by(|a, b| a.x.unwrap_or(0.0).total_cmp(&b.x.unwrap_or(0.0)));
    points
}

/// Mean of `value` per distinct `category` label, groups in first-seen order.
///
/// Non-numeric values add 0 to the group sum but still count toward its size.
pub(crate) fn grouped_means(dataset: &Dataset, category: &str, value: &str) -> (Vec<String>, Vec<f64>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    let mut sums: Vec<(f64, usize)> = Vec::new();

    for row in dataset.rows() {
        let label = row.get(category).label();
        let idx = match index.get(&label) {
            Some(&idx) => idx,
            None => {
                index.insert(label.clone(), labels.len());
                labels.push(label);
                sums.push((0.0, 0));
                labels.len() - 1
            }
        };
        sums[idx].0 += row.get(value).as_number().unwrap_or(0.0);
        sums[idx].1 += 1;
    }

    let means = sums
        .into_iter()
        .map(|(sum, count)| sum / count as f64)
        .collect();
    (labels, means)
}

/// Count of each distinct label in `column`, in first-seen order.
pub(crate) fn frequency_counts(dataset: &Dataset, column: &str) -> (Vec<String>, Vec<f64>) {
    let table: FrequencyTable = dataset.column_values(column).map(|v| v.label()).collect();
    table
        .into_entries()
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grouped_means() {
        let ds = Dataset::from_columns(vec![
            ("cat", vec!["A".into(), "A".into(), "B".into()]),
            ("val", vec![10.into(), 20.into(), 5.into()]),
        ]);
        let (labels, values) = grouped_means(&ds, "cat", "val");
        assert_eq!(labels, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(values, vec![15.0, 5.0]);
    }

    #[test]
    fn test_grouped_means_missing_counts_as_zero() {
        let ds = Dataset::from_columns(vec![
            ("cat", vec!["A".into(), "A".into()]),
            ("val", vec![10.into(), Value::Null]),
        ]);
        let (_, values) = grouped_means(&ds, "cat", "val");
        assert_eq!(values, vec![5.0]);
    }

    #[test]
    fn test_grouped_means_interleaved_groups() {
        let ds = Dataset::from_columns(vec![
            ("cat", vec!["B".into(), "A".into(), "B".into(), Value::Null, "A".into()]),
            ("val", vec![1.into(), 2.into(), 3.into(), 4.into(), 6.into()]),
        ]);
        let (labels, values) = grouped_means(&ds, "cat", "val");
        assert_eq!(
            labels,
            vec!["B".to_string(), "A".to_string(), "null".to_string()]
        );
        assert_eq!(values, vec![2.0, 4.0, 4.0]);
    }

    #[test]
    fn test_frequency_counts() {
        let ds = Dataset::from_columns(vec![("c", vec!["x".into(), "y".into(), "x".into()])]);
        let (labels, counts) = frequency_counts(&ds, "c");
        assert_eq!(labels, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(counts, vec![2.0, 1.0]);
    }

    #[test]
    fn test_line_points_sorted_with_missing_as_zero() {
        let ds = Dataset::from_columns(vec![
            ("x", vec![3.into(), Value::Null, (-1).into(), 1.into()]),
            ("y", vec![30.into(), 0.into(), 10.into(), 20.into()]),
        ]);
        let ys: Vec<Option<f64>> = line_points(&ds, "x", "y").iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![Some(10.0), Some(0.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_paired_points_keep_row_order() {
        let ds = Dataset::from_columns(vec![
            ("x", vec![2.into(), "bad".into()]),
            ("y", vec![Value::Null, 4.into()]),
        ]);
        let points = paired_points(&ds, "x", "y");
        assert_eq!(
            points,
            vec![
                Point { x: Some(2.0), y: None },
                Point { x: None, y: Some(4.0) },
            ]
        );
    }
}
