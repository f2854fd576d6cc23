use serde::{Deserialize, Serialize};

/// Missing-value statistics for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingnessEntry {
    pub column: String,
    pub dtype: String,
    pub missing_count: usize,
    /// Percentage of rows missing, rounded to 2 decimal places.
    pub missing_percentage: f64,
}

/// Per-column missing-value audit, ordered by descending missing percentage.
///
/// Rebuilt from the current dataset on every request; holding one across a
/// pruning or coercion call gives stale numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingnessReport {
    pub entries: Vec<MissingnessEntry>,
}

impl MissingnessReport {
    /// Look up the entry for a column by name.
    pub fn entry(&self, column: &str) -> Option<&MissingnessEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    /// Columns whose missing percentage strictly exceeds `threshold`,
    /// in report order.
    pub fn columns_above(&self, threshold: f64) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.missing_percentage > threshold)
            .map(|e| e.column.as_str())
            .collect()
    }
}

/// Summary statistics for a single numeric column.
///
/// Statistics are absent when the column has no non-null values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    /// Count of non-null values.
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q75: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Descriptive statistics over the numeric columns of a dataset, one row per
/// column in original column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveSummary {
    pub rows: Vec<ColumnStats>,
}

impl DescriptiveSummary {
    /// Look up the stats row for a column by name.
    pub fn row(&self, column: &str) -> Option<&ColumnStats> {
        self.rows.iter().find(|r| r.column == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(column: &str, missing_percentage: f64) -> MissingnessEntry {
        MissingnessEntry {
            column: column.to_string(),
            dtype: "String".to_string(),
            missing_count: 0,
            missing_percentage,
        }
    }

    #[test]
    fn test_columns_above_is_strict() {
        let report = MissingnessReport {
            entries: vec![entry("a", 60.0), entry("b", 50.0), entry("c", 10.0)],
        };
        assert_eq!(report.columns_above(50.0), vec!["a"]);
        assert_eq!(report.columns_above(9.0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_entry_lookup() {
        let report = MissingnessReport {
            entries: vec![entry("a", 60.0)],
        };
        assert!(report.entry("a").is_some());
        assert!(report.entry("missing").is_none());
    }

    #[test]
    fn test_summary_serialization_skips_absent_stats() {
        let summary = DescriptiveSummary {
            rows: vec![ColumnStats {
                column: "empty".to_string(),
                count: 0,
                mean: None,
                std_dev: None,
                min: None,
                q25: None,
                median: None,
                q75: None,
                max: None,
            }],
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"count\":0"));
        assert!(!json.contains("mean"));
    }

    #[test]
    fn test_report_roundtrip() {
        let report = MissingnessReport {
            entries: vec![entry("Bank", 33.33)],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: MissingnessReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries[0].column, "Bank");
        assert_eq!(back.entries[0].missing_percentage, 33.33);
    }
}
