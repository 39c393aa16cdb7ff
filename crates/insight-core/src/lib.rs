//! Insight Workspace Core
//!
//! Tabular cleaning, descriptive statistics and chart-series computation for
//! the insight workspace, plus the session and query-backend plumbing around
//! them.
//!
//! # Overview
//!
//! - **Loading**: CSV, tab/comma-separated TXT and spreadsheets into a [`Dataset`]
//! - **Cleaning**: duplicate removal and per-axis missing-value policies
//! - **Statistics**: count/mean/min/max per numeric column
//! - **Visualization**: eligible inputs and computed series for seven chart kinds
//! - **Session**: current dataset, SQL/PDF chats and dashboard counters
//! - **Query Backend**: SQL and PDF questions answered by a remote service
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use insight_core::{ChartKind, ChartSelection, Cleaner, CleaningConfig, NumericPolicy};
//!
//! let dataset = insight_core::loader::load_path("sales.csv")?;
//!
//! let config = CleaningConfig::builder()
//!     .numeric(NumericPolicy::FillMedian)
//!     .remove_duplicates(true)
//!     .build();
//! let (cleaned, report) = Cleaner::clean_with_report(&dataset, &config);
//! println!("{}", report.headline());
//!
//! let table = insight_core::stats::summarize(&cleaned);
//! let chart = insight_core::viz::configure(
//!     &cleaned,
//!     ChartKind::Bar,
//!     &ChartSelection::new().primary("region").secondary("units"),
//! )?;
//! ```
//!
//! All computations are pure: the input dataset is never modified and every
//! output is a plain serde value a frontend can render.

pub mod backend;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod session;
pub mod stats;
pub mod types;
pub mod utils;
pub mod viz;

// Re-exports for convenient access
#[cfg(feature = "backend")]
pub use backend::{HttpBackend, HttpBackendConfig};
pub use backend::QueryBackend;
pub use cleaner::{Cleaner, CleaningReport};
pub use config::{
    CategoricalPolicy, CleaningConfig, CleaningConfigBuilder, ConfigValidationError,
    DuplicatePolicy, NumericPolicy,
};
pub use error::{InsightError, Result, ResultExt};
pub use imputers::{ColumnFill, FillMethod, StatisticalImputer};
pub use session::{ChatContent, ChatMessage, ChatRole, DashboardStatus, Session};
pub use stats::{DatasetOverview, StatCell, Statistic, StatisticsTable};
pub use types::{ColumnKind, Dataset, Row, Value};
pub use viz::{ChartConfig, ChartKind, ChartSelection, ChartSeries, InputSpec, Point, SlotRole};
