//! CLI entry point for the insurance EDA toolkit.

use anyhow::{Result, anyhow};
use clap::Parser;
use insurance_eda::{DEFAULT_MISSING_THRESHOLD, DatasetProfiler, EdaReport, analysis, reporting};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Numeric columns the original analysis correlates; filtered to the ones
/// actually present in a given extract.
const KEY_NUMERIC_COLUMNS: [&str; 8] = [
    "CalculatedPremiumPerTerm",
    "TotalClaims",
    "TotalPremium",
    "SumInsured",
    "CapitalOutstanding",
    "kilowatts",
    "cubiccapacity",
    "Cylinders",
];

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis for insurance policy datasets",
    long_about = "Profiles an insurance-policy CSV: missing-value audit, \
                  high-missing column pruning, type normalization, and \
                  descriptive statistics.\n\n\
                  EXAMPLES:\n  \
                  # Full pipeline with the default 50% pruning threshold\n  \
                  insurance-eda -i policies.csv\n\n  \
                  # Stricter pruning, machine-readable output\n  \
                  insurance-eda -i policies.csv --threshold 30 --json"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Missing-percentage threshold for column pruning (0-100)
    #[arg(short, long, default_value_t = DEFAULT_MISSING_THRESHOLD)]
    threshold: f64,

    /// Skip type normalization of the named insurance columns
    #[arg(long)]
    no_normalize: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and the final tables)
    #[arg(short, long)]
    quiet: bool,

    /// Output a single JSON report to stdout instead of tables
    ///
    /// Disables all logging; only JSON is written to stdout.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
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

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded: {:?}", data.shape());

    run_analysis(args, data)
}

fn run_analysis(args: Args, data: DataFrame) -> Result<()> {
    let input_columns: Vec<String> = data
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut profiler = DatasetProfiler::new(data);

    let missingness = profiler.missingness_report()?;
    profiler.drop_high_missing_columns(args.threshold)?;

    let dropped_columns: Vec<String> = input_columns
        .iter()
        .filter(|name| profiler.data().column(name.as_str()).is_err())
        .cloned()
        .collect();

    if !args.no_normalize {
        profiler.normalize_types()?;
    }

    let summary = profiler.descriptive_statistics()?;
    let correlations = key_correlations(profiler.data())?;
    let outliers = analysis::outlier_summary(profiler.data())?;

    if args.json {
        let report = EdaReport {
            input_file: args.input,
            rows: profiler.data().height(),
            columns: profiler.data().width(),
            missingness,
            dropped_columns,
            descriptive_statistics: summary,
            correlations,
            outliers,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // User-facing tables go to stdout regardless of log level.
    println!("\nMISSING VALUES");
    println!("{}", reporting::render_missingness(&missingness));

    println!("DESCRIPTIVE STATISTICS");
    println!("{}", reporting::render_summary(&summary));

    if let Some(matrix) = correlations {
        println!("CORRELATIONS (key numeric columns)");
        println!("{}", reporting::render_correlations(&matrix));
    }

    if !outliers.is_empty() {
        println!("OUTLIER FENCES (IQR)");
        println!("{}", reporting::render_outliers(&outliers));
    }

    Ok(())
}

/// Correlation matrix over the key numeric columns present in this extract.
///
/// Falls back to every numeric column when fewer than two of the key ones
/// survive pruning; returns None when there is still nothing to correlate.
fn key_correlations(df: &DataFrame) -> Result<Option<analysis::CorrelationMatrix>> {
    let numeric_names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| insurance_eda::utils::is_numeric_dtype(col.as_materialized_series().dtype()))
        .map(|col| col.name().to_string())
        .collect();

    let mut selected: Vec<&str> = KEY_NUMERIC_COLUMNS
        .iter()
        .copied()
        .filter(|name| numeric_names.iter().any(|n| n == name))
        .collect();
    if selected.len() < 2 {
        selected = numeric_names.iter().map(|s| s.as_str()).collect();
    }
    if selected.len() < 2 {
        debug!("Fewer than two numeric columns; skipping correlations");
        return Ok(None);
    }

    Ok(Some(analysis::correlation_matrix(df, &selected)?))
}

/// Load CSV with fallback strategies for messy quoting.
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: without quote handling
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Failed to read {}: {}", path, e))
}
