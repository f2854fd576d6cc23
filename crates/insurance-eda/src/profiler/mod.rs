//! Dataset profiling: missing-value auditing, threshold pruning, and
//! descriptive statistics.

mod statistics;

pub(crate) use statistics::{iqr_fences, numeric_values};

use crate::coerce::TypeNormalizer;
use crate::error::{AnalysisError, Result};
use crate::types::{DescriptiveSummary, MissingnessEntry, MissingnessReport};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::{debug, info};

/// Default missing-percentage threshold for column pruning.
pub const DEFAULT_MISSING_THRESHOLD: f64 = 50.0;

/// Profiler owning one tabular dataset across a pipeline run.
///
/// Construction takes the `DataFrame` by value: the profiler is the sole
/// owner of its table, so no caller-held alias can observe or race the
/// in-place mutations performed by [`drop_high_missing_columns`] and
/// [`normalize_types`]. Callers that want to keep the raw data clone before
/// constructing.
///
/// Operations are conventionally run in the order missingness report →
/// column pruning → type normalization → descriptive statistics. The order
/// is a usage guideline, not enforced: pruning after coercion merely wastes
/// the coercion work spent on columns that get dropped.
///
/// [`drop_high_missing_columns`]: DatasetProfiler::drop_high_missing_columns
/// [`normalize_types`]: DatasetProfiler::normalize_types
pub struct DatasetProfiler {
    df: DataFrame,
}

impl DatasetProfiler {
    /// Create a profiler over an owned dataset.
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Borrow the current state of the dataset.
    pub fn data(&self) -> &DataFrame {
        &self.df
    }

    /// Consume the profiler and hand the (possibly mutated) dataset back.
    pub fn into_inner(self) -> DataFrame {
        self.df
    }

    /// Audit missing values across all columns.
    ///
    /// Each entry carries the missing count, the percentage of rows missing
    /// (rounded to 2 decimal places), and the column dtype. Entries are
    /// sorted by descending percentage; ties keep original column order.
    ///
    /// Fails with [`AnalysisError::EmptyDataset`] when the dataset has no
    /// rows, since a missing percentage is undefined there.
    pub fn missingness_report(&self) -> Result<MissingnessReport> {
        let total_rows = self.df.height();
        if total_rows == 0 {
            return Err(AnalysisError::EmptyDataset);
        }

        let mut entries = Vec::with_capacity(self.df.width());
        for col in self.df.get_columns() {
            let series = col.as_materialized_series();
            let missing_count = series.null_count();
            let pct = 100.0 * missing_count as f64 / total_rows as f64;
            entries.push(MissingnessEntry {
                column: series.name().to_string(),
                dtype: format!("{:?}", series.dtype()),
                missing_count,
                missing_percentage: (pct * 100.0).round() / 100.0,
            });
        }

        // Stable sort keeps original column order among ties.
        entries.sort_by(|a, b| {
            b.missing_percentage
                .partial_cmp(&a.missing_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(MissingnessReport { entries })
    }

    /// Drop every column whose missing percentage strictly exceeds
    /// `threshold` (a percentage in `[0, 100]`).
    ///
    /// The comparison uses unrounded percentages. Retained columns keep
    /// their values and relative order. The outcome (which columns were
    /// dropped, or that none qualified) goes to the log; "nothing to drop"
    /// is a normal result, not an error.
    ///
    /// The dataset is mutated in place, so repeated calls compose: a second
    /// call at a lower threshold prunes further, and a second call at the
    /// same threshold drops nothing.
    pub fn drop_high_missing_columns(&mut self, threshold: f64) -> Result<&DataFrame> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(AnalysisError::InvalidThreshold(threshold));
        }
        let total_rows = self.df.height();
        if total_rows == 0 {
            return Err(AnalysisError::EmptyDataset);
        }

        let columns_to_drop: Vec<String> = self
            .df
            .get_columns()
            .iter()
            .filter(|col| {
                let series = col.as_materialized_series();
                let pct = 100.0 * series.null_count() as f64 / total_rows as f64;
                pct > threshold
            })
            .map(|col| col.name().to_string())
            .collect();

        if !columns_to_drop.is_empty() {
            let cols_ref: Vec<PlSmallStr> = columns_to_drop
                .iter()
                .map(|s| s.as_str().into())
                .collect();
            self.df = self.df.drop_many(cols_ref);
            info!(
                "Dropped {} columns above {:.0}% missing: {:?}",
                columns_to_drop.len(),
                threshold,
                columns_to_drop
            );
        } else {
            info!("No columns exceeded the {:.0}% missing threshold", threshold);
        }

        Ok(&self.df)
    }

    /// Coerce the named insurance columns to their semantic types.
    ///
    /// Delegates to [`TypeNormalizer`]; the operation is atomic across the
    /// required column set, so a missing column leaves the dataset exactly
    /// as it was.
    pub fn normalize_types(&mut self) -> Result<&DataFrame> {
        TypeNormalizer.normalize(&mut self.df)?;
        Ok(&self.df)
    }

    /// Summary statistics over the numeric columns, one row per column in
    /// original order. Non-numeric columns are excluded, not an error.
    pub fn descriptive_statistics(&self) -> Result<DescriptiveSummary> {
        let mut rows = Vec::new();
        for col in self.df.get_columns() {
            let series = col.as_materialized_series();
            if !is_numeric_dtype(series.dtype()) {
                debug!("Skipping non-numeric column '{}'", series.name());
                continue;
            }
            rows.push(statistics::column_stats(series.name(), series)?);
        }
        Ok(DescriptiveSummary { rows })
    }
}
