//! CLI entry point for the insight workspace core.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use insight_core::{
    CategoricalPolicy, ChartConfig, ChartKind, ChartSelection, ChartSeries, CleaningConfig,
    CleaningReport, DatasetOverview, NumericPolicy, Session, StatisticsTable, loader,
};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

#[cfg(feature = "backend")]
use insight_core::backend::{HttpBackend, HttpBackendConfig, SqlAnswer};
#[cfg(feature = "backend")]
use std::env;

/// CLI-compatible numeric policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNumericPolicy {
    /// Fill with the mean of the column's numbers
    Mean,
    /// Fill with the lower median of the column's numbers
    Median,
    /// Fill with zero
    Zero,
    /// Drop rows with a missing numeric value
    Drop,
    /// Leave numeric columns untouched
    Keep,
}

impl From<CliNumericPolicy> for NumericPolicy {
    fn from(cli: CliNumericPolicy) -> Self {
        match cli {
            CliNumericPolicy::Mean => NumericPolicy::FillMean,
            CliNumericPolicy::Median => NumericPolicy::FillMedian,
            CliNumericPolicy::Zero => NumericPolicy::FillZero,
            CliNumericPolicy::Drop => NumericPolicy::DropRows,
            CliNumericPolicy::Keep => NumericPolicy::Keep,
        }
    }
}

/// CLI-compatible categorical policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategoricalPolicy {
    /// Fill with the most frequent value
    Mode,
    /// Fill with "Unknown"
    Unknown,
    /// Drop rows with a missing categorical value
    Drop,
    /// Leave categorical columns untouched
    Keep,
}

impl From<CliCategoricalPolicy> for CategoricalPolicy {
    fn from(cli: CliCategoricalPolicy) -> Self {
        match cli {
            CliCategoricalPolicy::Mode => CategoricalPolicy::FillMode,
            CliCategoricalPolicy::Unknown => CategoricalPolicy::FillUnknown,
            CliCategoricalPolicy::Drop => CategoricalPolicy::DropRows,
            CliCategoricalPolicy::Keep => CategoricalPolicy::Keep,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliChartKind {
    Histogram,
    Box,
    Scatter,
    Line,
    Bar,
    Pie,
    Heatmap,
}

impl From<CliChartKind> for ChartKind {
    fn from(cli: CliChartKind) -> Self {
        match cli {
            CliChartKind::Histogram => ChartKind::Histogram,
            CliChartKind::Box => ChartKind::BoxPlot,
            CliChartKind::Scatter => ChartKind::Scatter,
            CliChartKind::Line => ChartKind::Line,
            CliChartKind::Bar => ChartKind::Bar,
            CliChartKind::Pie => ChartKind::Pie,
            CliChartKind::Heatmap => ChartKind::CorrelationHeatmap,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean, summarize and chart tabular data",
    long_about = "Load a CSV, TXT or spreadsheet file, apply cleaning policies, and print \
                  the statistics table and chart series.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  INSIGHT_BACKEND_URL   Query service root for --ask (default http://localhost:8000)\n\n\
                  EXAMPLES:\n  \
                  # Overview and statistics\n  \
                  insight -i data.csv\n\n  \
                  # Fill gaps, drop duplicates and save the result\n  \
                  insight -i data.csv --numeric median --categorical mode --dedup -o cleaned.csv\n\n  \
                  # Bar chart series as JSON\n  \
                  insight -i data.csv --chart bar --x region --y units --json"
)]
struct Args {
    /// Path to the CSV, TXT or spreadsheet file
    #[arg(short, long)]
    input: String,

    /// Policy for missing numeric values
    #[arg(long, value_enum, default_value = "keep")]
    numeric: CliNumericPolicy,

    /// Policy for missing categorical values
    #[arg(long, value_enum, default_value = "keep")]
    categorical: CliCategoricalPolicy,

    /// Remove duplicate rows before any other cleaning
    #[arg(long)]
    dedup: bool,

    /// Chart to compute after cleaning
    #[arg(long, value_enum)]
    chart: Option<CliChartKind>,

    /// Primary chart column (column, x axis or category)
    #[arg(long)]
    x: Option<String>,

    /// Secondary chart column (y axis or value)
    #[arg(long)]
    y: Option<String>,

    /// Write the cleaned dataset as CSV to this path
    #[arg(short, long)]
    output: Option<String>,

    /// Upload the file to the query service and ask this question
    #[cfg(feature = "backend")]
    #[arg(long)]
    ask: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs; only the final JSON document is written.
    #[arg(long)]
    json: bool,
}

/// Everything the CLI computed, for `--json`.
#[derive(Serialize)]
struct CliOutput {
    file: String,
    overview: DatasetOverview,
    cleaning: CleaningReport,
    statistics: StatisticsTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartConfig>,
    #[cfg(feature = "backend")]
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<SqlAnswer>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    let path = Path::new(&args.input);
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&args.input)
        .to_string();

    let mut session = Session::new();
    info!("Loading dataset from: {}", args.input);
    let dataset = loader::load_path(path)?;
    session.load_dataset(&file_name, dataset);

    let config = CleaningConfig::builder()
        .numeric(args.numeric.into())
        .categorical(args.categorical.into())
        .remove_duplicates(args.dedup)
        .build();
    let cleaning = session.apply_cleaning(&config)?;

    let overview = session.overview()?;
    let statistics = session.summary()?;

    let chart = match args.chart {
        Some(kind) => {
            let mut selection = ChartSelection::new();
            if let Some(x) = &args.x {
                selection = selection.primary(x);
            }
            if let Some(y) = &args.y {
                selection = selection.secondary(y);
            }
            Some(session.chart(kind.into(), &selection)?)
        }
        None => None,
    };

    if let Some(output) = &args.output {
        loader::save_csv(session.dataset()?, output)
            .with_context(|| format!("Failed to write {}", output))?;
    }

    #[cfg(feature = "backend")]
    let sql = match &args.ask {
        Some(question) => Some(ask_backend(&mut session, path, &file_name, question)?),
        None => None,
    };

    let result = CliOutput {
        file: file_name,
        overview,
        cleaning,
        statistics,
        chart,
        #[cfg(feature = "backend")]
        sql,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_human_readable_summary(&result);
    }

    Ok(())
}

#[cfg(feature = "backend")]
fn ask_backend(
    session: &mut Session,
    path: &Path,
    file_name: &str,
    question: &str,
) -> Result<SqlAnswer> {
    let mut builder = HttpBackendConfig::builder();
    if let Ok(url) = env::var("INSIGHT_BACKEND_URL") {
        builder = builder.base_url(url);
    }
    let backend = HttpBackend::with_config(builder.build())?;
    info!("Using query backend at {}", backend.config().base_url);

    let bytes = std::fs::read(path)?;
    session.upload_dataset(&backend, file_name, &bytes)?;
    let answer = session.ask_sql(&backend, question);
    session.end(&backend);
    Ok(answer?)
}

/// Print tables for a terminal.
///
/// Uses `println!` on purpose: this is the command's output, not logging.
fn print_human_readable_summary(result: &CliOutput) {
    println!("\n{}", "=".repeat(80));
    println!("DATASET: {}", result.file);
    println!("{}", "=".repeat(80));
    println!(
        "  {} rows · {} columns · {} missing",
        result.overview.rows, result.overview.columns, result.overview.missing
    );
    println!("  Numeric:     {}", result.overview.numeric_columns.join(", "));
    println!(
        "  Categorical: {}",
        result.overview.categorical_columns.join(", ")
    );
    println!();

    if !result.cleaning.processing_steps.is_empty() {
        println!("CLEANING");
        println!("{}", "-".repeat(40));
        for step in &result.cleaning.processing_steps {
            println!("  • {}", step);
        }
        println!("  {}", result.cleaning.headline());
        println!();
    }

    println!("STATISTICS");
    println!("{}", "-".repeat(40));
    if result.statistics.is_empty() {
        println!("  No numeric columns");
    } else {
        print!("{:<8}", "");
        for col in &result.statistics.columns {
            print!(" {:>14}", truncate_str(col, 14));
        }
        println!();
        for row in &result.statistics.rows {
            print!("{:<8}", row.stat.as_str());
            for cell in &row.cells {
                print!(" {:>14}", cell.to_string());
            }
            println!();
        }
    }
    println!();

    if let Some(chart) = &result.chart {
        print_chart(chart);
    }

    #[cfg(feature = "backend")]
    if let Some(sql) = &result.sql {
        println!("SQL ANSWER");
        println!("{}", "-".repeat(40));
        println!("  {}", sql.sql_query);
        if let Some(error) = &sql.error {
            println!("  Error: {}", error);
        }
        println!("  {} rows", sql.row_count);
        if let Some(summary) = &sql.ai_summary {
            println!("\n{}", summary);
        }
        println!();
    }
}

fn print_chart(chart: &ChartConfig) {
    println!("CHART: {}", chart.title);
    println!("{}", "-".repeat(40));
    match &chart.series {
        ChartSeries::Values { values, .. } => {
            println!("  {} values", values.len());
        }
        ChartSeries::Points { points, .. } => {
            for p in points.iter().take(20) {
                println!("  ({}, {})", fmt_opt(p.x), fmt_opt(p.y));
            }
            if points.len() > 20 {
                println!("  ... {} more", points.len() - 20);
            }
        }
        ChartSeries::Categories { labels, values, .. } => {
            for (label, value) in labels.iter().zip(values) {
                println!("  {:<20} {:.2}", truncate_str(label, 19), value);
            }
        }
        ChartSeries::Matrix { columns, values } => {
            print!("{:<14}", "");
            for col in columns {
                print!(" {:>8}", truncate_str(col, 8));
            }
            println!();
            for (col, row) in columns.iter().zip(values) {
                print!("{:<14}", truncate_str(col, 13));
                for v in row {
                    print!(" {:>8.2}", v);
                }
                println!();
            }
        }
        ChartSeries::Empty => {
            warn!("No eligible columns for {}", chart.kind);
            println!("  No eligible columns");
        }
    }
    println!();
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |n| n.to_string())
}

fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
