//! Type normalization for the loosely-typed insurance columns.
//!
//! The source data ships dates and amounts as text; this module converts the
//! fixed, named set of columns to their semantic types in place. The
//! operation is atomic across the set: every replacement series is parsed
//! before any column is touched, so a structural failure (a required column
//! that does not exist) leaves the dataset exactly as it was.

mod parsers;

use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use tracing::debug;

/// Vehicle model introduction month, stored as month/year text.
pub const VEHICLE_INTRO_DATE: &str = "VehicleIntroDate";
/// First registration year of the insured vehicle.
pub const REGISTRATION_YEAR: &str = "RegistrationYear";
/// Month of the premium transaction, stored as a full date-time.
pub const TRANSACTION_MONTH: &str = "TransactionMonth";
/// Outstanding capital amount; present in most but not all extracts.
pub const CAPITAL_OUTSTANDING: &str = "CapitalOutstanding";

/// Columns that must exist for normalization to run at all.
const REQUIRED_COLUMNS: [&str; 3] = [VEHICLE_INTRO_DATE, REGISTRATION_YEAR, TRANSACTION_MONTH];

/// Normalizer applying the named-column coercion plan.
///
/// Cell-level parse failures degrade to null; only a missing required
/// column aborts, reported as [`AnalysisError::MissingColumn`].
pub struct TypeNormalizer;

impl TypeNormalizer {
    /// Coerce the named columns to their semantic types, in place.
    ///
    /// - [`VEHICLE_INTRO_DATE`] → `Date`, strict month/year parse, day
    ///   normalized to the 1st
    /// - [`REGISTRATION_YEAR`] → nullable `Int32`
    /// - [`TRANSACTION_MONTH`] → `Datetime` (milliseconds)
    /// - [`CAPITAL_OUTSTANDING`] → `Float64`, when the column exists
    ///
    /// Column order and names are preserved.
    pub fn normalize(&self, df: &mut DataFrame) -> Result<()> {
        let mut staged: Vec<(&str, Series)> = Vec::with_capacity(4);

        for name in REQUIRED_COLUMNS {
            let col = df.column(name).map_err(|e| AnalysisError::MissingColumn {
                column: name.to_string(),
                source: e,
            })?;
            let series = col.as_materialized_series();
            let converted = match name {
                VEHICLE_INTRO_DATE => parsers::to_year_month(series)?,
                REGISTRATION_YEAR => parsers::to_integer(series)?,
                _ => parsers::to_datetime(series)?,
            };
            staged.push((name, converted));
        }

        // Optional column: normalized when present, never required.
        if let Ok(col) = df.column(CAPITAL_OUTSTANDING) {
            let converted = parsers::to_float(col.as_materialized_series())?;
            staged.push((CAPITAL_OUTSTANDING, converted));
        }

        // All conversions parsed; commit the plan.
        for (name, series) in staged {
            let nulls_after = series.null_count();
            df.replace(name, series)?;
            debug!(
                "Normalized '{}' ({} nulls after coercion)",
                name, nulls_after
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_df() -> DataFrame {
        df![
            "PolicyID" => [1i64, 2, 3],
            "VehicleIntroDate" => ["03/2019", "6/2002", "not a date"],
            "RegistrationYear" => ["2015", "N/A", "2004"],
            "TransactionMonth" => ["2015-03-01 00:00:00", "2015-04-01 00:00:00", "bad"],
            "CapitalOutstanding" => ["119300.5", "0", "N/A"],
        ]
        .unwrap()
    }

    #[test]
    fn test_normalize_converts_all_named_columns() {
        let mut df = policy_df();
        TypeNormalizer.normalize(&mut df).unwrap();

        assert_eq!(
            df.column("VehicleIntroDate").unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(
            df.column("RegistrationYear").unwrap().dtype(),
            &DataType::Int32
        );
        assert!(matches!(
            df.column("TransactionMonth").unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
        assert_eq!(
            df.column("CapitalOutstanding").unwrap().dtype(),
            &DataType::Float64
        );
        // Untouched column keeps its dtype
        assert_eq!(df.column("PolicyID").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_normalize_preserves_column_order() {
        let mut df = policy_df();
        let before: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        TypeNormalizer.normalize(&mut df).unwrap();
        let after: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_normalize_unparseable_cells_become_null() {
        let mut df = policy_df();
        TypeNormalizer.normalize(&mut df).unwrap();

        assert_eq!(df.column("VehicleIntroDate").unwrap().null_count(), 1);
        assert_eq!(df.column("RegistrationYear").unwrap().null_count(), 1);
        assert_eq!(df.column("TransactionMonth").unwrap().null_count(), 1);
        assert_eq!(df.column("CapitalOutstanding").unwrap().null_count(), 1);
    }

    #[test]
    fn test_normalize_missing_required_column_aborts() {
        let mut df = df![
            "VehicleIntroDate" => ["03/2019"],
            "RegistrationYear" => ["2015"],
            // TransactionMonth absent
        ]
        .unwrap();

        let err = TypeNormalizer.normalize(&mut df).unwrap_err();
        match err {
            AnalysisError::MissingColumn { column, .. } => {
                assert_eq!(column, "TransactionMonth");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }

        // No partial commit: the present columns keep their original dtype
        assert_eq!(
            df.column("VehicleIntroDate").unwrap().dtype(),
            &DataType::String
        );
        assert_eq!(
            df.column("RegistrationYear").unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn test_normalize_without_optional_column() {
        let mut df = df![
            "VehicleIntroDate" => ["03/2019"],
            "RegistrationYear" => ["2015"],
            "TransactionMonth" => ["2015-03-01"],
        ]
        .unwrap();

        TypeNormalizer.normalize(&mut df).unwrap();
        assert_eq!(
            df.column("RegistrationYear").unwrap().dtype(),
            &DataType::Int32
        );
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let mut df = policy_df();
        TypeNormalizer.normalize(&mut df).unwrap();
        // A second pass over already-typed columns must not lose data
        TypeNormalizer.normalize(&mut df).unwrap();

        assert_eq!(df.column("RegistrationYear").unwrap().null_count(), 1);
        assert_eq!(df.column("VehicleIntroDate").unwrap().null_count(), 1);
    }
}
