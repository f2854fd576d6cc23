//! Error types for the analysis toolkit.
//!
//! Errors follow a two-tier policy: structural problems (a bad threshold, a
//! zero-row dataset, a required column that does not exist) abort the
//! operation and surface here. Value-level parse failures never do: the
//! coercers substitute a null for any cell that fails to convert, so a messy
//! column degrades gracefully instead of failing the whole run.

use thiserror::Error;

/// The main error type for profiling and coercion operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Missing-value threshold outside the accepted percentage range.
    #[error("threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),

    /// Percentage computation requested on a dataset with no rows.
    #[error("dataset has no rows")]
    EmptyDataset,

    /// A column required by type normalization is absent from the dataset.
    #[error("column '{column}' required for type normalization is missing")]
    MissingColumn {
        column: String,
        #[source]
        source: polars::error::PolarsError,
    },

    /// Polars error wrapper.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error left the dataset untouched.
    ///
    /// All structural errors abort before mutating, so a caller can keep
    /// using the profiler after any of them.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidThreshold(_) | Self::EmptyDataset | Self::MissingColumn { .. } => true,
            Self::Polars(_) => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_column() {
        let err = AnalysisError::MissingColumn {
            column: "TransactionMonth".to_string(),
            source: polars::error::PolarsError::ColumnNotFound("TransactionMonth".into()),
        };
        assert!(err.to_string().contains("TransactionMonth"));
    }

    #[test]
    fn test_with_context_preserves_source() {
        let err = AnalysisError::InvalidThreshold(120.0).with_context("during pruning");
        assert!(err.to_string().contains("during pruning"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AnalysisError::EmptyDataset.is_recoverable());
        assert!(AnalysisError::InvalidThreshold(-1.0).is_recoverable());
        assert!(
            !AnalysisError::Polars(polars::error::PolarsError::NoData("empty".into()))
                .is_recoverable()
        );
    }
}
