//! Descriptive statistics for numeric columns.
//!
//! [`summarize`] builds the count/mean/min/max table shown under the data
//! preview; [`DatasetOverview`] carries the row/column/missing counters.

use crate::types::Dataset;
use crate::utils::{format_fixed2, max, mean, min};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows of the statistics table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Count,
    Mean,
    Min,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [
        Statistic::Count,
        Statistic::Mean,
        Statistic::Min,
        Statistic::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// One cell of the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatCell {
    Count(usize),
    /// Value rendered with two decimals.
    Fixed(String),
    /// The column has no numeric entries, so there is nothing to show.
    Empty,
}

impl fmt::Display for StatCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatCell::Count(n) => write!(f, "{}", n),
            StatCell::Fixed(s) => f.write_str(s),
            StatCell::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub stat: Statistic,
    /// One cell per entry of [`StatisticsTable::columns`].
    pub cells: Vec<StatCell>,
}

/// count/mean/min/max for every numeric column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsTable {
    pub columns: Vec<String>,
    pub rows: Vec<StatRow>,
}

impl StatisticsTable {
    /// Look up one cell by statistic and column name.
    pub fn get(&self, stat: Statistic, column: &str) -> Option<&StatCell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.stat == stat)
            .and_then(|r| r.cells.get(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Compute the statistics table over the dataset's numeric columns.
pub fn summarize(dataset: &Dataset) -> StatisticsTable {
    summarize_columns(dataset, &dataset.numeric_columns())
}

/// Compute the statistics table over an explicit column list.
///
/// Columns without numeric entries get a count of 0 and empty cells.
pub fn summarize_columns(dataset: &Dataset, columns: &[String]) -> StatisticsTable {
    let values: Vec<Vec<f64>> = columns
        .iter()
        .map(|c| dataset.numeric_values(c))
        .collect();

    let fixed = |v: Option<f64>| v.map_or(StatCell::Empty, |x| StatCell::Fixed(format_fixed2(x)));

    let rows = Statistic::ALL
        .iter()
        .map(|&stat| StatRow {
            stat,
            cells: values
                .iter()
                .map(|vals| match stat {
                    Statistic::Count => StatCell::Count(vals.len()),
                    Statistic::Mean => fixed(mean(vals)),
                    Statistic::Min => fixed(min(vals)),
                    Statistic::Max => fixed(max(vals)),
                })
                .collect(),
        })
        .collect();

    StatisticsTable {
        columns: columns.to_vec(),
        rows,
    }
}

/// Headline counters for a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    /// Null or empty cells across every column.
    pub missing: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

impl DatasetOverview {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            rows: dataset.height(),
            columns: dataset.width(),
            missing: dataset.missing_count(),
            numeric_columns: dataset.numeric_columns(),
            categorical_columns: dataset.categorical_columns(),
        }
    }
}
