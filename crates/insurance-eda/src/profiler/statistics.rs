//! Numeric helpers behind the descriptive and outlier reports.

use crate::error::Result;
use crate::types::ColumnStats;
use polars::prelude::*;

/// Collect the non-null values of a numeric series as f64, in row order.
pub(crate) fn numeric_values(series: &Series) -> Result<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;
    Ok(ca.into_iter().flatten().collect())
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n <= 1 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile of a sorted slice with linear interpolation between ranks.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        Some(sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo]))
    }
}

/// Compute the full summary-statistics row for one numeric column.
pub(crate) fn column_stats(name: &str, series: &Series) -> Result<ColumnStats> {
    let mut values = numeric_values(series)?;
    let count = values.len();
    if count == 0 {
        return Ok(ColumnStats {
            column: name.to_string(),
            count: 0,
            mean: None,
            std_dev: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        });
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = sample_std(&values);
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(ColumnStats {
        column: name.to_string(),
        count,
        mean: Some(mean),
        std_dev,
        min: values.first().copied(),
        q25: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.50),
        q75: quantile_sorted(&values, 0.75),
        max: values.last().copied(),
    })
}

/// IQR fences for outlier detection: (Q1 - 1.5*IQR, Q3 + 1.5*IQR).
///
/// Returns None when fewer than 4 values are available, where quartiles stop
/// being meaningful.
pub(crate) fn iqr_fences(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 4 {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}
