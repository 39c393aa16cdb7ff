//! Statistical imputation methods.
//!
//! Provides mean, lower-median, zero, mode and constant imputation over the
//! rows of a dataset. Every method fills only cells that are missing (null or
//! empty string) and leaves present values alone.

use crate::types::{Row, Value};
use crate::utils::{FrequencyTable, format_fixed2, lower_median, mean};
use serde::{Deserialize, Serialize};

/// Literal used by constant categorical imputation.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// How a column's missing cells were filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    Mean,
    Median,
    Zero,
    Mode,
    Constant,
}

impl FillMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Zero => "zero",
            Self::Mode => "mode",
            Self::Constant => "constant",
        }
    }
}

/// Record of one column fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFill {
    pub column: String,
    pub method: FillMethod,
    pub value: Value,
    /// Number of cells that were missing and got the fill value.
    pub filled: usize,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column with the mean of its numeric entries.
    ///
    /// Returns `None` (and changes nothing) when the column holds no numbers.
    pub fn apply_numeric_mean(
        rows: &mut [Row],
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Option<ColumnFill> {
        let mean_val = mean(&numeric_entries(rows, column))?;
        Some(Self::fill_with_value(
            rows,
            column,
            Value::Number(mean_val),
            FillMethod::Mean,
            processing_steps,
        ))
    }

    /// Fill a numeric column with the lower median of its numeric entries.
    pub fn apply_numeric_median(
        rows: &mut [Row],
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Option<ColumnFill> {
        let median_val = lower_median(&numeric_entries(rows, column))?;
        Some(Self::fill_with_value(
            rows,
            column,
            Value::Number(median_val),
            FillMethod::Median,
            processing_steps,
        ))
    }

    /// Fill a numeric column with 0.
    pub fn apply_zero_imputation(
        rows: &mut [Row],
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFill {
        Self::fill_with_value(
            rows,
            column,
            Value::Number(0.0),
            FillMethod::Zero,
            processing_steps,
        )
    }

    /// Fill a categorical column with its most frequent non-missing value.
    ///
    /// Ties go to the value seen first. A column with no present values is left as is.
    pub fn apply_mode_imputation(
        rows: &mut [Row],
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Option<ColumnFill> {
        let freq: FrequencyTable = rows
            .iter()
            .map(|row| row.get(column))
            .filter(|v| !v.is_missing())
            .map(Value::label)
            .collect();

        let mode_val = freq.mode()?.to_string();
        Some(Self::fill_with_value(
            rows,
            column,
            Value::Text(mode_val),
            FillMethod::Mode,
            processing_steps,
        ))
    }

    /// Fill a categorical column with the constant "Unknown".
    pub fn apply_constant_imputation(
        rows: &mut [Row],
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFill {
        Self::fill_with_value(
            rows,
            column,
            Value::from(UNKNOWN_LABEL),
            FillMethod::Constant,
            processing_steps,
        )
    }

    fn fill_with_value(
        rows: &mut [Row],
        column: &str,
        fill_value: Value,
        method: FillMethod,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFill {
        let mut filled = 0;
        for row in rows.iter_mut() {
            if row.get(column).is_missing() {
                row.set(column, fill_value.clone());
                filled += 1;
            }
        }

        let shown = match &fill_value {
            Value::Number(n) => format_fixed2(*n),
            other => format!("'{}'", other),
        };
        processing_steps.push(format!(
            "Filled '{}' with {}: {} ({} cells)",
            column,
            method.as_str(),
            shown,
            filled
        ));

        ColumnFill {
            column: column.to_string(),
            method,
            value: fill_value,
            filled,
        }
    }
}

fn numeric_entries(rows: &[Row], column: &str) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.get(column).as_number())
        .collect()
}
