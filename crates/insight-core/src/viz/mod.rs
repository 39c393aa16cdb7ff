//! Chart configuration: eligible inputs and computed series per chart kind.
//!
//! The configurator does not draw anything. For a chart kind it reports
//! which columns may be picked for each input ([`input_spec`]) and, given a
//! selection, computes the data series a renderer needs ([`configure`]).
//!
//! | kind | inputs | series |
//! |---|---|---|
//! | Histogram, Box Plot | numeric column | numeric values |
//! | Scatter | numeric x, numeric y | (x, y) per row |
//! | Line | numeric x, numeric y | (x, y) sorted by x |
//! | Bar | categorical category, numeric value | mean value per category |
//! | Pie | categorical column | count per category |
//! | Correlation Heatmap | none | Pearson matrix of numeric columns |

mod aggregate;
mod correlation;

pub use correlation::{correlation_matrix, pearson};

use crate::error::{InsightError, Result};
use crate::types::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    BoxPlot,
    Scatter,
    Line,
    Bar,
    Pie,
    CorrelationHeatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::CorrelationHeatmap,
    ];

    /// Label used by the chart-type selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Histogram => "Histogram",
            Self::BoxPlot => "Box Plot",
            Self::Scatter => "Scatter Plot",
            Self::Line => "Line Chart",
            Self::Bar => "Bar Chart",
            Self::Pie => "Pie Chart",
            Self::CorrelationHeatmap => "Correlation Heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "histogram" => Ok(Self::Histogram),
            "boxplot" | "box" => Ok(Self::BoxPlot),
            "scatterplot" | "scatter" => Ok(Self::Scatter),
            "linechart" | "line" => Ok(Self::Line),
            "barchart" | "bar" => Ok(Self::Bar),
            "piechart" | "pie" => Ok(Self::Pie),
            "correlationheatmap" | "heatmap" | "correlation" => Ok(Self::CorrelationHeatmap),
            _ => Err(InsightError::InvalidConfig(format!(
                "Unknown chart type '{}'",
                s
            ))),
        }
    }
}

/// Role of one chart input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    Column,
    XAxis,
    YAxis,
    Category,
    Value,
}

impl SlotRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Column => "Column",
            Self::XAxis => "X Axis",
            Self::YAxis => "Y Axis",
            Self::Category => "Category",
            Self::Value => "Value",
        }
    }
}

/// One selectable input and the columns allowed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    pub role: SlotRole,
    /// Eligible columns; the first one is the default choice.
    pub options: Vec<String>,
}

/// All inputs for a chart kind, primary first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputSpec {
    pub slots: Vec<InputSlot>,
}

/// The user's column choices. Unset entries fall back to the slot's first option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSelection {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl ChartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(mut self, column: impl Into<String>) -> Self {
        self.primary = Some(column.into());
        self
    }

    pub fn secondary(mut self, column: impl Into<String>) -> Self {
        self.secondary = Some(column.into());
        self
    }
}

/// A chart coordinate; `None` where the row held no number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Data a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSeries {
    /// Raw values of one column.
    Values { column: String, values: Vec<f64> },
    /// Paired coordinates.
    Points {
        x_column: String,
        y_column: String,
        points: Vec<Point>,
    },
    /// One value per category label.
    Categories {
        category_column: String,
        value_column: Option<String>,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    /// Square matrix over `columns`.
    Matrix {
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
    },
    /// No eligible column exists for a required input.
    Empty,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Values { values, .. } => values.is_empty(),
            Self::Points { points, .. } => points.is_empty(),
            Self::Categories { labels, .. } => labels.is_empty(),
            Self::Matrix { columns, .. } => columns.is_empty(),
            Self::Empty => true,
        }
    }
}

/// Inputs, series and title for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: String,
    pub input_spec: InputSpec,
    pub series: ChartSeries,
}

/// Columns that may be picked for each input of `kind`.
pub fn input_spec(dataset: &Dataset, kind: ChartKind) -> InputSpec {
    let numeric = dataset.numeric_columns();
    let slot = |role, options| InputSlot { role, options };

    let slots = match kind {
        ChartKind::Histogram | ChartKind::BoxPlot => vec![slot(SlotRole::Column, numeric)],
        ChartKind::Scatter | ChartKind::Line => {
            // y defaults to the second numeric column so it differs from x
            let mut rotated = numeric.clone();
            if !rotated.is_empty() {
                rotated.rotate_left(1);
            }
            vec![slot(SlotRole::XAxis, numeric), slot(SlotRole::YAxis, rotated)]
        }
        ChartKind::Bar => vec![
            slot(SlotRole::Category, dataset.categorical_columns()),
            slot(SlotRole::Value, numeric),
        ],
        ChartKind::Pie => vec![slot(SlotRole::Column, dataset.categorical_columns())],
        ChartKind::CorrelationHeatmap => Vec::new(),
    };

    InputSpec { slots }
}

/// Compute the chart configuration for `kind` and the given selection.
///
/// # Errors
///
/// - [`InsightError::ColumnNotFound`] when a selected column is not in the dataset.
/// - [`InsightError::InvalidChartInput`] when a selected column is not eligible for its input.
pub fn configure(
    dataset: &Dataset,
    kind: ChartKind,
    selection: &ChartSelection,
) -> Result<ChartConfig> {
    let spec = input_spec(dataset, kind);
    let primary = resolve(dataset, kind, spec.slots.first(), selection.primary.as_deref())?;
    let secondary = resolve(dataset, kind, spec.slots.get(1), selection.secondary.as_deref())?;

    let (title, series) = match (kind, primary, secondary) {
        (ChartKind::Histogram, Some(col), _) => (
            format!("Histogram — {}", col),
            ChartSeries::Values {
                values: aggregate::column_values(dataset, &col),
                column: col,
            },
        ),
        (ChartKind::BoxPlot, Some(col), _) => (
            format!("Box Plot — {}", col),
            ChartSeries::Values {
                values: aggregate::column_values(dataset, &col),
                column: col,
            },
        ),
        (ChartKind::Scatter, Some(x), Some(y)) => (
            format!("{} vs {}", y, x),
            ChartSeries::Points {
                points: aggregate::paired_points(dataset, &x, &y),
                x_column: x,
                y_column: y,
            },
        ),
        (ChartKind::Line, Some(x), Some(y)) => (
            format!("{} over {}", y, x),
            ChartSeries::Points {
                points: aggregate::line_points(dataset, &x, &y),
                x_column: x,
                y_column: y,
            },
        ),
        (ChartKind::Bar, Some(cat), Some(val)) => {
            let (labels, values) = aggregate::grouped_means(dataset, &cat, &val);
            (
                format!("Avg {} by {}", val, cat),
                ChartSeries::Categories {
                    category_column: cat,
                    value_column: Some(val),
                    labels,
                    values,
                },
            )
        }
        (ChartKind::Pie, Some(col), _) => {
            let (labels, values) = aggregate::frequency_counts(dataset, &col);
            (
                format!("Distribution — {}", col),
                ChartSeries::Categories {
                    category_column: col,
                    value_column: None,
                    labels,
                    values,
                },
            )
        }
        (ChartKind::CorrelationHeatmap, _, _) => {
            let columns = dataset.numeric_columns();
            (
                "Correlation Heatmap".to_string(),
                ChartSeries::Matrix {
                    values: correlation_matrix(dataset, &columns),
                    columns,
                },
            )
        }
        (kind, _, _) => (kind.label().to_string(), ChartSeries::Empty),
    };

    Ok(ChartConfig {
        kind,
        title,
        input_spec: spec,
        series,
    })
}

fn resolve(
    dataset: &Dataset,
    kind: ChartKind,
    slot: Option<&InputSlot>,
    chosen: Option<&str>,
) -> Result<Option<String>> {
    let Some(slot) = slot else {
        return Ok(None);
    };

    match chosen {
        Some(column) => {
            if !dataset.has_column(column) {
                return Err(InsightError::ColumnNotFound(column.to_string()));
            }
            if !slot.options.iter().any(|c| c == column) {
                return Err(InsightError::InvalidChartInput {
                    column: column.to_string(),
                    role: slot.role.label().to_string(),
                    chart: kind.label().to_string(),
                });
            }
            Ok(Some(column.to_string()))
        }
        None => Ok(slot.options.first().cloned()),
    }
}
