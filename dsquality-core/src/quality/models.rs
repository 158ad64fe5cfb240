//! Quality evaluation result models.
//!
//! Everything here serializes to plain JSON: numbers, booleans, strings,
//! ordered lists and name-keyed maps. Results carry no timestamps or ids so
//! that evaluating the same input twice yields identical output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::ColumnKind;

/// Row and column counts of the evaluated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    pub n_rows: u64,
    pub n_cols: u64,
}

/// Flags produced from aggregate summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFlags {
    pub too_few_rows: bool,
    pub too_many_columns: bool,
    pub too_many_missing: bool,
    pub no_numeric_columns: bool,
    pub no_categorical_columns: bool,
}

impl SummaryFlags {
    /// True if any of the hard flags that block training is set.
    ///
    /// `no_numeric_columns` and `no_categorical_columns` are advisory only.
    pub fn blocks_training(&self) -> bool {
        self.too_few_rows || self.too_many_columns || self.too_many_missing
    }

    /// Number of flags that are set.
    pub fn count(&self) -> usize {
        [
            self.too_few_rows,
            self.too_many_columns,
            self.too_many_missing,
            self.no_numeric_columns,
            self.no_categorical_columns,
        ]
        .into_iter()
        .filter(|f| *f)
        .count()
    }
}

/// Flags produced by full-table inspection, each with its supporting detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFlags {
    pub has_high_missing: bool,
    pub high_missing_columns: Vec<String>,
    pub has_duplicates: bool,
    pub duplicate_count: u64,
    pub has_constant_columns: bool,
    pub constant_columns: Vec<String>,
    pub has_high_cardinality_categoricals: bool,
    pub high_cardinality_columns: Vec<String>,
    pub has_many_zero_values: bool,
    pub high_zero_columns: Vec<String>,
    /// Zero share of every numeric column, in table column order
    pub zero_shares: IndexMap<String, f64>,
}

impl TableFlags {
    /// Boolean flags by name, in a fixed order.
    pub fn booleans(&self) -> [(&'static str, bool); 5] {
        [
            ("has_high_missing", self.has_high_missing),
            ("has_duplicates", self.has_duplicates),
            ("has_constant_columns", self.has_constant_columns),
            (
                "has_high_cardinality_categoricals",
                self.has_high_cardinality_categoricals,
            ),
            ("has_many_zero_values", self.has_many_zero_values),
        ]
    }

    /// True if no boolean flag is set.
    pub fn is_clean(&self) -> bool {
        self.booleans().iter().all(|(_, set)| !set)
    }
}

/// Outcome of one evaluation call.
///
/// `quality_score` is on a 0-1 scale for [`SummaryFlags`] results and on a
/// 0-100 scale for [`TableFlags`] results. The two are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult<F> {
    pub ok_for_model: bool,
    pub quality_score: f64,
    pub flags: F,
    pub dataset_shape: DatasetShape,
}

/// Per-column diagnostics computed fresh for each inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name
    pub name: String,
    /// Declared column kind
    pub kind: ColumnKind,
    /// Count of missing cells
    pub missing_count: u64,
    /// Count of distinct non-missing values
    pub distinct_count: u64,
    /// Count of cells equal to zero (numeric columns only)
    pub zero_count: Option<u64>,
    /// True if the column has at most one distinct non-missing value
    pub is_constant: bool,
}

impl ColumnProfile {
    /// Fraction of cells that are missing (0.0-1.0).
    pub fn missing_share(&self, n_rows: u64) -> f64 {
        share(self.missing_count, n_rows)
    }

    /// Fraction of all cells equal to zero; `None` for categorical columns.
    ///
    /// Missing cells stay in the denominator.
    pub fn zero_share(&self, n_rows: u64) -> Option<f64> {
        self.zero_count.map(|zeros| share(zeros, n_rows))
    }

    /// Distinct values per row (0.0-1.0).
    pub fn cardinality_ratio(&self, n_rows: u64) -> f64 {
        share(self.distinct_count, n_rows)
    }
}

/// `part / total` clamped to [0, 1], with an empty total counting as 0.
pub(crate) fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64).clamp(0.0, 1.0)
    }
}
