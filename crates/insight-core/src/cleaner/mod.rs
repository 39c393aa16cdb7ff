//! Data cleaning module.
//!
//! This module provides:
//! - Duplicate row removal
//! - Numeric missing-value handling (drop rows, mean, median, zero)
//! - Categorical missing-value handling (drop rows, mode, "Unknown")
//!
//! Cleaning is copy-on-write: the input [`Dataset`] is never modified and a
//! new one is returned. The three axes run in a fixed order: duplicates,
//! then numeric, then categorical. Column classification is taken once from
//! the input dataset.

mod dedup;

pub use dedup::count_duplicates;

use crate::config::{CategoricalPolicy, CleaningConfig, DuplicatePolicy, NumericPolicy};
use crate::imputers::{ColumnFill, StatisticalImputer};
use crate::types::{Dataset, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a cleaning run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    /// Rows removed by the numeric `DropRows` policy.
    pub numeric_rows_dropped: usize,
    /// Rows removed by the categorical `DropRows` policy.
    pub categorical_rows_dropped: usize,
    pub fills: Vec<ColumnFill>,
    /// Human-readable log of every step, in execution order.
    pub processing_steps: Vec<String>,
}

impl CleaningReport {
    /// One-line result, e.g. `Cleaned! 42 rows remaining.`
    pub fn headline(&self) -> String {
        format!("Cleaned! {} rows remaining.", self.rows_after)
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }

    pub fn cells_filled(&self) -> usize {
        self.fills.iter().map(|f| f.filled).sum()
    }
}

/// Applies a [`CleaningConfig`] to a dataset.
pub struct Cleaner;

impl Cleaner {
    /// Return a cleaned copy of `dataset`.
    pub fn clean(dataset: &Dataset, config: &CleaningConfig) -> Dataset {
        Self::clean_with_report(dataset, config).0
    }

    /// Return a cleaned copy of `dataset` together with a report of what changed.
    pub fn clean_with_report(
        dataset: &Dataset,
        config: &CleaningConfig,
    ) -> (Dataset, CleaningReport) {
        let numeric_cols = dataset.numeric_columns();
        let categorical_cols = dataset.categorical_columns();

        let mut report = CleaningReport {
            rows_before: dataset.height(),
            ..Default::default()
        };

        info!(
            rows = dataset.height(),
            numeric = ?config.numeric,
            categorical = ?config.categorical,
            duplicates = ?config.duplicates,
            "Cleaning dataset"
        );

        let mut rows: Vec<Row> = dataset.rows().to_vec();

        // 1. Duplicates
        if config.duplicates == DuplicatePolicy::RemoveDuplicates {
            let before = rows.len();
            rows = dedup::remove_duplicates(dataset, rows);
            report.duplicates_removed = before - rows.len();
            report
                .processing_steps
                .push(format!("Removed {} duplicate rows", report.duplicates_removed));
            debug!("Removed {} duplicate rows", report.duplicates_removed);
        }

        // 2. Numeric columns
        match config.numeric {
            NumericPolicy::DropRows => {
                let before = rows.len();
                rows = drop_rows_missing_any(rows, &numeric_cols);
                report.numeric_rows_dropped = before - rows.len();
                report.processing_steps.push(format!(
                    "Dropped {} rows with missing numeric values",
                    report.numeric_rows_dropped
                ));
            }
            NumericPolicy::FillMean => {
                for col in &numeric_cols {
                    report.fills.extend(StatisticalImputer::apply_numeric_mean(
                        &mut rows,
                        col,
                        &mut report.processing_steps,
                    ));
                }
            }
            NumericPolicy::FillMedian => {
                for col in &numeric_cols {
                    report.fills.extend(StatisticalImputer::apply_numeric_median(
                        &mut rows,
                        col,
                        &mut report.processing_steps,
                    ));
                }
            }
            NumericPolicy::FillZero => {
                for col in &numeric_cols {
                    report.fills.push(StatisticalImputer::apply_zero_imputation(
                        &mut rows,
                        col,
                        &mut report.processing_steps,
                    ));
                }
            }
            NumericPolicy::Keep => {}
        }

        // 3. Categorical columns
        match config.categorical {
            CategoricalPolicy::DropRows => {
                let before = rows.len();
                rows = drop_rows_missing_any(rows, &categorical_cols);
                report.categorical_rows_dropped = before - rows.len();
                report.processing_steps.push(format!(
                    "Dropped {} rows with missing categorical values",
                    report.categorical_rows_dropped
                ));
            }
            CategoricalPolicy::FillMode => {
                for col in &categorical_cols {
                    report.fills.extend(StatisticalImputer::apply_mode_imputation(
                        &mut rows,
                        col,
                        &mut report.processing_steps,
                    ));
                }
            }
            CategoricalPolicy::FillUnknown => {
                for col in &categorical_cols {
                    report
                        .fills
                        .push(StatisticalImputer::apply_constant_imputation(
                            &mut rows,
                            col,
                            &mut report.processing_steps,
                        ));
                }
            }
            CategoricalPolicy::Keep => {}
        }

        report.rows_after = rows.len();
        info!("{}", report.headline());

        (dataset.with_rows(rows), report)
    }
}

fn drop_rows_missing_any(rows: Vec<Row>, columns: &[String]) -> Vec<Row> {
    rows.into_iter()
        .filter(|row| columns.iter().all(|c| !row.get(c).is_missing()))
        .collect()
}
