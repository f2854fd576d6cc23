//! Renderer-facing derived data: correlations, category frequencies, and
//! outlier fences.
//!
//! Nothing here draws anything. These routines compute the tables a chart
//! renderer (or the CLI) consumes, over the cleaned dataset.

use crate::error::{AnalysisError, Result};
use crate::profiler::{iqr_fences, numeric_values};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pearson correlation coefficients over a set of numeric columns.
///
/// `coefficients[i][j]` correlates `columns[i]` with `columns[j]`; an entry
/// is absent when fewer than two pairwise-complete observations exist or one
/// side has zero variance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Look up a coefficient by column names.
    pub fn coefficient(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.coefficients[i][j]
    }
}

/// Frequency of one category value within a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// IQR fences and outlier count for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub column: String,
    pub lower: f64,
    pub upper: f64,
    pub outlier_count: usize,
}

/// Pearson correlation matrix over the named columns, using
/// pairwise-complete observations.
///
/// Every named column must exist; an absent one fails with
/// [`AnalysisError::MissingColumn`] so a renderer never silently plots a
/// partial matrix.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix> {
    let mut series_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let col = df.column(name).map_err(|e| AnalysisError::MissingColumn {
            column: name.to_string(),
            source: e,
        })?;
        let float_series = col.as_materialized_series().cast(&DataType::Float64)?;
        let ca = float_series.f64()?;
        series_values.push(ca.into_iter().collect());
    }

    let n = columns.len();
    let mut coefficients = vec![vec![None; n]; n];
    for i in 0..n {
        for j in 0..n {
            if j < i {
                coefficients[i][j] = coefficients[j][i];
            } else {
                coefficients[i][j] = pearson(&series_values[i], &series_values[j]);
            }
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|s| s.to_string()).collect(),
        coefficients,
    })
}

/// Pearson coefficient over the rows where both sides are present.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Category frequencies for a column, sorted by descending count with ties
/// broken by value. Nulls are not counted as a category.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<ValueCount>> {
    let col = df.column(column).map_err(|e| AnalysisError::MissingColumn {
        column: column.to_string(),
        source: e,
    })?;
    let series = col.as_materialized_series();
    let non_null = series.drop_nulls();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for i in 0..non_null.len() {
        let val = non_null.get(i)?;
        let text = match val {
            AnyValue::String(s) => s.to_string(),
            other => format!("{}", other),
        };
        *counts.entry(text).or_insert(0) += 1;
    }

    let mut result: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    Ok(result)
}

/// IQR fences and outlier counts over every numeric column.
///
/// Columns with fewer than 4 non-null values are skipped; quartiles carry
/// no information there.
pub fn outlier_summary(df: &DataFrame) -> Result<Vec<OutlierBounds>> {
    let mut bounds = Vec::new();
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if !is_numeric_dtype(series.dtype()) {
            continue;
        }
        let values = numeric_values(series)?;
        let Some((lower, upper)) = iqr_fences(&values) else {
            continue;
        };
        let outlier_count = values.iter().filter(|v| **v < lower || **v > upper).count();
        bounds.push(OutlierBounds {
            column: series.name().to_string(),
            lower,
            upper,
            outlier_count,
        });
    }
    Ok(bounds)
}
