//! Imputation module for handling missing values.
//!
//! Statistical imputation strategies (mean, lower median, zero, mode, constant).

mod statistical;

pub use statistical::{ColumnFill, FillMethod, StatisticalImputer, UNKNOWN_LABEL};
