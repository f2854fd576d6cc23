//! Per-column series parsers for type normalization.
//!
//! Every parser recovers from bad cells locally: a value that fails to
//! convert becomes null in the output series. Only the callers decide what
//! counts as a structural failure.

use crate::error::Result;
use crate::utils::{clean_numeric_string, is_missing_marker, parse_numeric_string};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Accepted textual date-time formats, tried in order.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Accepted textual date-only formats, tried after the date-time ones.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("1970-01-01 is a valid date")
}

/// Parse a strict month/year value like `"03/2019"` or `"3/2019"`.
///
/// The month may be one or two digits, the year must be four; anything else
/// (including day-bearing dates) is rejected.
pub(crate) fn parse_month_year(s: &str) -> Option<NaiveDate> {
    let (month_part, year_part) = s.trim().split_once('/')?;
    if month_part.is_empty() || month_part.len() > 2 || year_part.len() != 4 {
        return None;
    }
    let month: u32 = month_part.parse().ok()?;
    let year: i32 = year_part.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Convert a column to year-month dates (dtype `Date`, day forced to 1).
///
/// String input uses the strict month/year rule of [`parse_month_year`];
/// `Date` input is re-floored to the first of its month; any other dtype
/// coerces to null.
pub(crate) fn to_year_month(series: &Series) -> Result<Series> {
    let epoch = unix_epoch();
    let days: Vec<Option<i32>> = match series.dtype() {
        DataType::String => {
            let str_series = series.str()?;
            str_series
                .into_iter()
                .map(|opt_val| {
                    let val = opt_val?;
                    let trimmed = val.trim();
                    if trimmed.is_empty() || is_missing_marker(trimmed) {
                        return None;
                    }
                    let date = parse_month_year(trimmed)?;
                    Some((date - epoch).num_days() as i32)
                })
                .collect()
        }
        DataType::Date => {
            let int_series = series.cast(&DataType::Int32)?;
            let ca = int_series.i32()?;
            ca.into_iter()
                .map(|opt_days| {
                    let days = opt_days?;
                    let date = epoch.checked_add_signed(chrono::Duration::days(days as i64))?;
                    let floored = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
                    Some((floored - epoch).num_days() as i32)
                })
                .collect()
        }
        _ => vec![None; series.len()],
    };

    let int_series = Series::new(series.name().clone(), days);
    Ok(int_series.cast(&DataType::Date)?)
}

/// Convert a column to nullable integers (dtype `Int32`).
///
/// Strings are cleaned of numeric formatting and parsed through f64 (so
/// `"2015.0"` still lands on 2015); values outside the `i32` range become
/// null rather than wrapping.
pub(crate) fn to_integer(series: &Series) -> Result<Series> {
    let truncate = |val: f64| -> Option<i32> {
        if val.is_finite() && val >= i32::MIN as f64 && val <= i32::MAX as f64 {
            Some(val as i32)
        } else {
            None
        }
    };

    let values: Vec<Option<i32>> = match series.dtype() {
        DataType::String => {
            let str_series = series.str()?;
            str_series
                .into_iter()
                .map(|opt_val| {
                    let val = opt_val?;
                    let trimmed = val.trim();
                    if trimmed.is_empty() || is_missing_marker(trimmed) {
                        return None;
                    }
                    let cleaned = clean_numeric_string(trimmed);
                    cleaned.parse::<f64>().ok().and_then(truncate)
                })
                .collect()
        }
        dtype if crate::utils::is_numeric_dtype(dtype) => {
            let float_series = series.cast(&DataType::Float64)?;
            let ca = float_series.f64()?;
            ca.into_iter()
                .map(|opt_val| opt_val.and_then(truncate))
                .collect()
        }
        _ => vec![None; series.len()],
    };

    Ok(Series::new(series.name().clone(), values))
}

/// Convert a column to full date-times (dtype `Datetime`, millisecond unit).
///
/// String input tries the fixed format lists, then falls back to the epoch
/// heuristic for bare numbers (10-digit timestamps are seconds, 13-digit
/// are milliseconds). Existing `Date`/`Datetime` columns cast through.
pub(crate) fn to_datetime(series: &Series) -> Result<Series> {
    let target = DataType::Datetime(TimeUnit::Milliseconds, None);

    match series.dtype() {
        DataType::Datetime(_, _) | DataType::Date => {
            return Ok(series.cast(&target)?);
        }
        _ => {}
    }

    let timestamps: Vec<Option<i64>> = match series.dtype() {
        DataType::String => {
            let str_series = series.str()?;
            str_series
                .into_iter()
                .map(|opt_val| {
                    let val = opt_val?;
                    let trimmed = val.trim();
                    if trimmed.is_empty() || is_missing_marker(trimmed) {
                        return None;
                    }
                    if let Ok(timestamp) = trimmed.parse::<i64>() {
                        return epoch_to_millis(timestamp);
                    }
                    parse_datetime_text(trimmed)
                })
                .collect()
        }
        dtype if crate::utils::is_numeric_dtype(dtype) => {
            let float_series = series.cast(&DataType::Float64)?;
            let ca = float_series.f64()?;
            ca.into_iter()
                .map(|opt_val| {
                    let val = opt_val?;
                    if !val.is_finite() {
                        return None;
                    }
                    epoch_to_millis(val as i64)
                })
                .collect()
        }
        _ => vec![None; series.len()],
    };

    let int_series = Series::new(series.name().clone(), timestamps);
    Ok(int_series.cast(&target)?)
}

/// Convert a column to nullable floats (dtype `Float64`).
///
/// Strings are cleaned of currency symbols and separators; as a last resort
/// the numeric part of a mixed string (`"ZAR 119300"`) is extracted.
pub(crate) fn to_float(series: &Series) -> Result<Series> {
    let values: Vec<Option<f64>> = match series.dtype() {
        DataType::String => {
            let str_series = series.str()?;
            str_series
                .into_iter()
                .map(|opt_val| {
                    let val = opt_val?;
                    if let Some(float_val) = parse_numeric_string(val) {
                        return Some(float_val);
                    }
                    let trimmed = val.trim();
                    if trimmed.is_empty() || is_missing_marker(trimmed) {
                        return None;
                    }
                    // Extract the numeric part from mixed strings
                    let numeric_part: String = clean_numeric_string(trimmed)
                        .chars()
                        .filter(|c| c.is_numeric() || *c == '.' || *c == '-')
                        .collect();
                    numeric_part.parse::<f64>().ok()
                })
                .collect()
        }
        dtype if crate::utils::is_numeric_dtype(dtype) => {
            return Ok(series.cast(&DataType::Float64)?);
        }
        _ => vec![None; series.len()],
    };

    Ok(Series::new(series.name().clone(), values))
}

/// Interpret a bare integer as an epoch timestamp in milliseconds.
///
/// Values in the 1e9..2e9 range read as seconds (2001-2033), 1e12..2e12 as
/// milliseconds; anything else is rejected.
fn epoch_to_millis(timestamp: i64) -> Option<i64> {
    if (1_000_000_000..2_000_000_000).contains(&timestamp) {
        Some(timestamp * 1000)
    } else if (1_000_000_000_000..2_000_000_000_000).contains(&timestamp) {
        Some(timestamp)
    } else {
        None
    }
}

fn parse_datetime_text(s: &str) -> Option<i64> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_since_epoch(year: i32, month: u32, day: u32) -> i32 {
        (NaiveDate::from_ymd_opt(year, month, day).unwrap() - unix_epoch()).num_days() as i32
    }

    fn millis_at_midnight(year: i32, month: u32, day: u32) -> i64 {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    // ==================== parse_month_year tests ====================

    #[test]
    fn test_parse_month_year_strict() {
        assert_eq!(
            parse_month_year("03/2019"),
            NaiveDate::from_ymd_opt(2019, 3, 1)
        );
        assert_eq!(
            parse_month_year("3/2019"),
            NaiveDate::from_ymd_opt(2019, 3, 1)
        );
        assert_eq!(
            parse_month_year("12/2004"),
            NaiveDate::from_ymd_opt(2004, 12, 1)
        );
    }

    #[test]
    fn test_parse_month_year_rejects_loose_input() {
        assert_eq!(parse_month_year("13/2019"), None);
        assert_eq!(parse_month_year("0/2019"), None);
        assert_eq!(parse_month_year("03/19"), None);
        assert_eq!(parse_month_year("2019-03-15"), None);
        assert_eq!(parse_month_year("not a date"), None);
        // Day-bearing input must not sneak through
        assert_eq!(parse_month_year("03/15/2019"), None);
    }

    // ==================== to_year_month tests ====================

    #[test]
    fn test_to_year_month_from_strings() {
        let series = Series::new(
            "VehicleIntroDate".into(),
            &[Some("03/2019"), Some("not a date"), None, Some("N/A")],
        );
        let result = to_year_month(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Date);
        let physical = result.cast(&DataType::Int32).unwrap();
        let ca = physical.i32().unwrap();
        assert_eq!(ca.get(0), Some(days_since_epoch(2019, 3, 1)));
        assert_eq!(ca.get(1), None);
        assert_eq!(ca.get(2), None);
        assert_eq!(ca.get(3), None);
    }

    #[test]
    fn test_to_year_month_floors_existing_dates() {
        let days = vec![Some(days_since_epoch(2019, 3, 15))];
        let series = Series::new("d".into(), days)
            .cast(&DataType::Date)
            .unwrap();
        let result = to_year_month(&series).unwrap();

        let physical = result.cast(&DataType::Int32).unwrap();
        assert_eq!(
            physical.i32().unwrap().get(0),
            Some(days_since_epoch(2019, 3, 1))
        );
    }

    #[test]
    fn test_to_year_month_other_dtype_nulls() {
        let series = Series::new("d".into(), &[1.5f64, 2.5]);
        let result = to_year_month(&series).unwrap();
        assert_eq!(result.dtype(), &DataType::Date);
        assert_eq!(result.null_count(), 2);
    }

    // ==================== to_integer tests ====================

    #[test]
    fn test_to_integer_from_strings() {
        let series = Series::new(
            "RegistrationYear".into(),
            &[Some("2015"), Some("2004.0"), Some("N/A"), None, Some("abc")],
        );
        let result = to_integer(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Int32);
        let ca = result.i32().unwrap();
        assert_eq!(ca.get(0), Some(2015));
        assert_eq!(ca.get(1), Some(2004));
        assert_eq!(ca.get(2), None);
        assert_eq!(ca.get(3), None);
        assert_eq!(ca.get(4), None);
    }

    #[test]
    fn test_to_integer_from_numeric() {
        let series = Series::new("y".into(), &[Some(2015.0f64), None, Some(1998.7)]);
        let result = to_integer(&series).unwrap();
        let ca = result.i32().unwrap();
        assert_eq!(ca.get(0), Some(2015));
        assert_eq!(ca.get(1), None);
        assert_eq!(ca.get(2), Some(1998));
    }

    #[test]
    fn test_to_integer_out_of_range_nulls() {
        let series = Series::new("big".into(), &["99999999999999"]);
        let result = to_integer(&series).unwrap();
        assert_eq!(result.null_count(), 1);
    }

    // ==================== to_datetime tests ====================

    #[test]
    fn test_to_datetime_from_strings() {
        let series = Series::new(
            "TransactionMonth".into(),
            &[
                Some("2015-03-01 00:00:00"),
                Some("2015-03-01"),
                Some("garbage"),
                None,
            ],
        );
        let result = to_datetime(&series).unwrap();

        assert!(matches!(result.dtype(), DataType::Datetime(_, _)));
        let physical = result.cast(&DataType::Int64).unwrap();
        let ca = physical.i64().unwrap();
        assert_eq!(ca.get(0), Some(millis_at_midnight(2015, 3, 1)));
        assert_eq!(ca.get(1), Some(millis_at_midnight(2015, 3, 1)));
        assert_eq!(ca.get(2), None);
        assert_eq!(ca.get(3), None);
    }

    #[test]
    fn test_to_datetime_epoch_seconds() {
        // 1577836800 = 2020-01-01 in seconds
        let series = Series::new("ts".into(), &["1577836800"]);
        let result = to_datetime(&series).unwrap();
        let physical = result.cast(&DataType::Int64).unwrap();
        assert_eq!(
            physical.i64().unwrap().get(0),
            Some(millis_at_midnight(2020, 1, 1))
        );
    }

    #[test]
    fn test_to_datetime_epoch_out_of_range() {
        let series = Series::new("ts".into(), &["100", "999999999999999"]);
        let result = to_datetime(&series).unwrap();
        assert_eq!(result.null_count(), 2);
    }

    #[test]
    fn test_to_datetime_passes_through_dates() {
        let days = vec![Some(days_since_epoch(2015, 3, 1))];
        let series = Series::new("d".into(), days)
            .cast(&DataType::Date)
            .unwrap();
        let result = to_datetime(&series).unwrap();
        assert!(matches!(result.dtype(), DataType::Datetime(_, _)));
        assert_eq!(result.null_count(), 0);
    }

    // ==================== to_float tests ====================

    #[test]
    fn test_to_float_from_strings() {
        let series = Series::new(
            "CapitalOutstanding".into(),
            &[Some("119300.5"), Some("1,234.56"), Some("N/A"), None],
        );
        let result = to_float(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        let ca = result.f64().unwrap();
        assert_eq!(ca.get(0), Some(119300.5));
        assert_eq!(ca.get(1), Some(1234.56));
        assert_eq!(ca.get(2), None);
        assert_eq!(ca.get(3), None);
    }

    #[test]
    fn test_to_float_extracts_numeric_part() {
        let series = Series::new("amount".into(), &["ZAR119300.50"]);
        let result = to_float(&series).unwrap();
        assert_eq!(result.f64().unwrap().get(0), Some(119300.50));
    }

    #[test]
    fn test_to_float_from_numeric_casts() {
        let series = Series::new("x".into(), &[Some(1i64), None, Some(3)]);
        let result = to_float(&series).unwrap();
        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.f64().unwrap().get(0), Some(1.0));
        assert_eq!(result.null_count(), 1);
    }
}
