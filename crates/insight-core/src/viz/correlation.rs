//! Pearson correlation matrix over numeric columns.

use crate::types::Dataset;
use crate::utils::mean;

/// Pearson coefficient over the first `min(|a|, |b|)` values of each slice.
///
/// Returns 0 when fewer than two aligned values exist or when either side
/// has zero spread.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);

    let (Some(ma), Some(mb)) = (mean(a), mean(b)) else {
        return 0.0;
    };

    let num: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let da = a.iter().map(|x| (x - ma).powi(2)).sum::<f64>().sqrt();
    let db = b.iter().map(|y| (y - mb).powi(2)).sum::<f64>().sqrt();

    if da == 0.0 || db == 0.0 {
        return 0.0;
    }
    num / (da * db)
}

/// Square matrix of pairwise coefficients, indexed like `columns`.
///
/// Each column contributes its numeric entries in row order; values of two
/// columns are aligned by position within those lists, not by row.
pub fn correlation_matrix(dataset: &Dataset, columns: &[String]) -> Vec<Vec<f64>> {
    let values: Vec<Vec<f64>> = columns
        .iter()
        .map(|c| dataset.numeric_values(c))
        .collect();

    values
        .iter()
        .map(|v1| values.iter().map(|v2| pearson(v1, v2)).collect())
        .collect()
}
