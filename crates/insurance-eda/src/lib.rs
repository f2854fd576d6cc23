//! Insurance-Policy EDA Toolkit
//!
//! Exploratory data analysis over an insurance-policy dataset, built on
//! Polars.
//!
//! # Overview
//!
//! The library covers the data-quality half of an EDA session:
//!
//! - **Missing-value auditing**: per-column counts and percentages, sorted
//!   worst-first
//! - **Column pruning**: drop columns above a missing-percentage threshold
//! - **Type normalization**: coerce the named insurance columns (dates,
//!   registration years, amounts) to semantic types, with bad cells
//!   degrading to null
//! - **Descriptive statistics**: count/mean/std/quartiles per numeric column
//! - **Renderer-facing analysis**: correlation matrices, category
//!   frequencies, and IQR outlier fences for a downstream chart renderer
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use insurance_eda::{DatasetProfiler, DEFAULT_MISSING_THRESHOLD};
//! use polars::prelude::*;
//!
//! let df = CsvReader::from_path("policies.csv")?.finish()?;
//! let mut profiler = DatasetProfiler::new(df);
//!
//! let audit = profiler.missingness_report()?;
//! profiler.drop_high_missing_columns(DEFAULT_MISSING_THRESHOLD)?;
//! profiler.normalize_types()?;
//! let stats = profiler.descriptive_statistics()?;
//! ```
//!
//! The profiler owns its dataset: mutating operations work in place and
//! compose across calls. Cell-level parse failures never abort a run; only
//! structural problems (bad threshold, absent required column, zero-row
//! dataset) surface as [`AnalysisError`].

pub mod analysis;
pub mod coerce;
pub mod error;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    CorrelationMatrix, OutlierBounds, ValueCount, correlation_matrix, outlier_summary,
    value_counts,
};
pub use coerce::{
    CAPITAL_OUTSTANDING, REGISTRATION_YEAR, TRANSACTION_MONTH, TypeNormalizer, VEHICLE_INTRO_DATE,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use profiler::{DEFAULT_MISSING_THRESHOLD, DatasetProfiler};
pub use reporting::EdaReport;
pub use types::{
    ColumnStats, DescriptiveSummary, MissingnessEntry, MissingnessReport,
};
