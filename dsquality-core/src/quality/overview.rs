//! Descriptive dataset overview.
//!
//! These helpers describe a table rather than judge it: shape, per-column
//! missingness, basic numeric statistics and the most frequent categorical
//! values. They share the column model with the inspector but none of its
//! thresholds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::{ColumnKind, ColumnValues, Table};

use super::models::share;
use super::profile::profile_column;

/// Number of most frequent values reported per categorical column.
pub const DEFAULT_TOP_K: usize = 5;

/// Missing-value count and percentage for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDetail {
    pub count: u64,
    /// Percentage of rows (0-100), rounded to 2 decimals
    pub percent: f64,
}

/// Table-wide missing-value summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingInfo {
    pub total_missing: u64,
    pub columns_with_missing: u64,
    /// Only columns with at least one missing cell, in table column order
    pub details: IndexMap<String, MissingDetail>,
}

/// Basic statistics of a numeric column over its non-missing cells.
///
/// Statistics are `None` when there are too few values to compute them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: u64,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A categorical value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Frequency summary of a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub unique_count: u64,
    /// Most frequent values, ties broken by first appearance
    pub top_values: Vec<ValueCount>,
    pub null_count: u64,
}

/// Descriptive overview of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub n_rows: u64,
    pub n_cols: u64,
    pub columns: Vec<String>,
    pub kinds: IndexMap<String, ColumnKind>,
    pub missing: MissingInfo,
    pub numeric: IndexMap<String, NumericSummary>,
    pub categorical: IndexMap<String, CategoricalSummary>,
}

impl DatasetOverview {
    /// Builds an overview reporting the [`DEFAULT_TOP_K`] most frequent values.
    pub fn from_table(table: &Table) -> Self {
        Self::from_table_with_top_k(table, DEFAULT_TOP_K)
    }

    /// Builds an overview reporting up to `top_k` values per categorical column.
    pub fn from_table_with_top_k(table: &Table, top_k: usize) -> Self {
        let n_rows = table.n_rows() as u64;
        let mut kinds = IndexMap::with_capacity(table.n_cols());
        let mut missing = MissingInfo::default();
        let mut numeric = IndexMap::new();
        let mut categorical = IndexMap::new();

        for column in table.columns() {
            kinds.insert(column.name.clone(), column.kind());

            let profile = profile_column(column);
            missing.total_missing += profile.missing_count;
            if profile.missing_count > 0 {
                missing.details.insert(
                    column.name.clone(),
                    MissingDetail {
                        count: profile.missing_count,
                        percent: percent(profile.missing_count, n_rows),
                    },
                );
            }

            match &column.values {
                ColumnValues::Numeric(values) => {
                    numeric.insert(column.name.clone(), numeric_summary(values));
                }
                ColumnValues::Categorical(values) => {
                    categorical.insert(
                        column.name.clone(),
                        CategoricalSummary {
                            unique_count: profile.distinct_count,
                            top_values: top_values(values, top_k),
                            null_count: profile.missing_count,
                        },
                    );
                }
            }
        }
        missing.columns_with_missing = missing.details.len() as u64;

        Self {
            n_rows,
            n_cols: table.n_cols() as u64,
            columns: table.column_names().into_iter().map(String::from).collect(),
            kinds,
            missing,
            numeric,
            categorical,
        }
    }
}

/// One row of the per-column missing-value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingRow {
    pub column: String,
    pub missing_count: u64,
    /// Percentage of rows (0-100), rounded to 2 decimals
    pub missing_percent: f64,
}

/// Missing-value counts for every column, in table column order.
pub fn missing_table(table: &Table) -> Vec<MissingRow> {
    let n_rows = table.n_rows() as u64;
    table
        .columns()
        .iter()
        .map(|column| {
            let missing_count = profile_column(column).missing_count;
            MissingRow {
                column: column.name.clone(),
                missing_count,
                missing_percent: percent(missing_count, n_rows),
            }
        })
        .collect()
}

/// A column whose missing share reached the requested threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblematicColumn {
    pub column: String,
    /// Missing share (0.0-1.0), rounded to 4 decimals
    pub missing_share: f64,
    pub missing_count: u64,
}

/// Columns with a missing share of at least `min_missing_share`.
///
/// Sorted by missing share, highest first; columns with equal shares keep
/// their table order.
pub fn problematic_columns(table: &Table, min_missing_share: f64) -> Vec<ProblematicColumn> {
    let n_rows = table.n_rows() as u64;
    let mut problematic: Vec<ProblematicColumn> = table
        .columns()
        .iter()
        .filter_map(|column| {
            let missing_count = profile_column(column).missing_count;
            let missing_share = share(missing_count, n_rows);
            (missing_share >= min_missing_share).then(|| ProblematicColumn {
                column: column.name.clone(),
                missing_share: round_to(missing_share, 4),
                missing_count,
            })
        })
        .collect();

    problematic.sort_by(|a, b| b.missing_share.total_cmp(&a.missing_share));
    problematic
}

fn numeric_summary(values: &[Option<f64>]) -> NumericSummary {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let (mean, std) = calculate_statistics(&present);

    NumericSummary {
        count: present.len() as u64,
        mean,
        std,
        min: present.iter().copied().reduce(f64::min),
        max: present.iter().copied().reduce(f64::max),
    }
}

/// Mean and sample standard deviation.
fn calculate_statistics(values: &[f64]) -> (Option<f64>, Option<f64>) {
    if values.is_empty() {
        return (None, None);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    if values.len() < 2 {
        return (Some(mean), None);
    }

    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (Some(mean), Some(variance.sqrt()))
}

fn top_values(values: &[Option<String>], top_k: usize) -> Vec<ValueCount> {
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    // Stable sort keeps first-appearance order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_k)
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

fn percent(part: u64, total: u64) -> f64 {
    round_to(share(part, total) * 100.0, 2)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
