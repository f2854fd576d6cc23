//! Plain-text and JSON rendering of the derived reports for CLI output.

use crate::analysis::{CorrelationMatrix, OutlierBounds};
use crate::types::{DescriptiveSummary, MissingnessReport};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Aggregate report document emitted by `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    pub input_file: String,
    pub rows: usize,
    pub columns: usize,
    pub missingness: MissingnessReport,
    pub dropped_columns: Vec<String>,
    pub descriptive_statistics: DescriptiveSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationMatrix>,
    pub outliers: Vec<OutlierBounds>,
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

fn fmt_stat(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

/// Render the missing-value audit as a fixed-width table.
pub fn render_missingness(report: &MissingnessReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<14} {:>10} {:>10}",
        "Column", "Type", "Missing", "Missing %"
    );
    let _ = writeln!(out, "{}", "-".repeat(62));
    for entry in &report.entries {
        let _ = writeln!(
            out,
            "{:<24} {:<14} {:>10} {:>10.2}",
            truncate_str(&entry.column, 23),
            truncate_str(&entry.dtype, 13),
            entry.missing_count,
            entry.missing_percentage
        );
    }
    out
}

/// Render the descriptive statistics as a fixed-width table, one row per
/// numeric column.
pub fn render_summary(summary: &DescriptiveSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"
    );
    let _ = writeln!(out, "{}", "-".repeat(122));
    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:<24} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            truncate_str(&row.column, 23),
            row.count,
            fmt_stat(row.mean),
            fmt_stat(row.std_dev),
            fmt_stat(row.min),
            fmt_stat(row.q25),
            fmt_stat(row.median),
            fmt_stat(row.q75),
            fmt_stat(row.max)
        );
    }
    out
}

/// Render the correlation matrix as a fixed-width grid.
pub fn render_correlations(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<24}", "");
    for name in &matrix.columns {
        let _ = write!(out, " {:>10}", truncate_str(name, 10));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(24 + 11 * matrix.columns.len()));
    for (i, name) in matrix.columns.iter().enumerate() {
        let _ = write!(out, "{:<24}", truncate_str(name, 23));
        for coefficient in &matrix.coefficients[i] {
            let _ = write!(out, " {:>10}", fmt_stat(*coefficient));
        }
        let _ = writeln!(out);
    }
    out
}

/// Render the outlier fences as a fixed-width table.
pub fn render_outliers(bounds: &[OutlierBounds]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>14} {:>14} {:>10}",
        "Column", "Lower fence", "Upper fence", "Outliers"
    );
    let _ = writeln!(out, "{}", "-".repeat(66));
    for b in bounds {
        let _ = writeln!(
            out,
            "{:<24} {:>14.2} {:>14.2} {:>10}",
            truncate_str(&b.column, 23),
            b.lower,
            b.upper,
            b.outlier_count
        );
    }
    out
}
