//! Full-table inspection.
//!
//! Profiles every column of an in-memory [`Table`], derives table-wide flags
//! from the profiles and the duplicate-row scan, then scores the table on a
//! 0-100 scale.

use indexmap::IndexMap;

use crate::error::{QualityError, Result};
use crate::table::{ColumnKind, Table};

use super::config::TableConfig;
use super::models::{ColumnProfile, DatasetShape, QualityResult, TableFlags};
use super::profile::profile_columns;
use super::uniqueness::count_duplicate_rows;

/// Inspects materialised tables against [`TableConfig`] thresholds.
#[derive(Debug, Clone, Default)]
pub struct TableInspector {
    config: TableConfig,
}

impl TableInspector {
    /// Creates an inspector with the given thresholds.
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the inspector configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Inspects a table and returns flags plus a 0-100 quality score.
    ///
    /// # Errors
    /// Returns [`QualityError::EmptyDataset`] if the table has zero rows or
    /// zero columns. No column is scanned in that case.
    pub fn inspect(&self, table: &Table) -> Result<QualityResult<TableFlags>> {
        if table.is_empty() {
            return Err(QualityError::empty_dataset(table.n_rows(), table.n_cols()));
        }

        let n_rows = table.n_rows() as u64;
        let profiles = profile_columns(table);
        let duplicate_count = count_duplicate_rows(table);

        let flags = self.build_flags(&profiles, n_rows, duplicate_count);
        let quality_score = self.score(&flags);
        let ok_for_model = quality_score >= self.config.pass_score;

        tracing::debug!(
            n_rows,
            n_cols = table.n_cols(),
            quality_score,
            ok_for_model,
            "Table inspection complete"
        );

        Ok(QualityResult {
            ok_for_model,
            quality_score,
            flags,
            dataset_shape: DatasetShape {
                n_rows,
                n_cols: table.n_cols() as u64,
            },
        })
    }

    fn build_flags(
        &self,
        profiles: &[ColumnProfile],
        n_rows: u64,
        duplicate_count: u64,
    ) -> TableFlags {
        let config = &self.config;
        let mut flags = TableFlags {
            duplicate_count,
            has_duplicates: duplicate_count > 0,
            zero_shares: IndexMap::new(),
            ..TableFlags::default()
        };

        for profile in profiles {
            if profile.missing_share(n_rows) > config.high_missing_limit {
                flags.high_missing_columns.push(profile.name.clone());
            }

            if profile.is_constant {
                flags.constant_columns.push(profile.name.clone());
            }

            if profile.kind == ColumnKind::Categorical
                && profile.cardinality_ratio(n_rows) > config.cardinality_limit
                && profile.distinct_count > config.cardinality_floor
            {
                flags.high_cardinality_columns.push(profile.name.clone());
            }

            if let Some(zero_share) = profile.zero_share(n_rows) {
                if zero_share > config.zero_limit {
                    flags.high_zero_columns.push(profile.name.clone());
                }
                flags.zero_shares.insert(profile.name.clone(), zero_share);
            }
        }

        flags.has_high_missing = !flags.high_missing_columns.is_empty();
        flags.has_constant_columns = !flags.constant_columns.is_empty();
        flags.has_high_cardinality_categoricals = !flags.high_cardinality_columns.is_empty();
        flags.has_many_zero_values = !flags.high_zero_columns.is_empty();
        flags
    }

    /// 100 minus the penalty of every set flag, clamped to [0, 100].
    fn score(&self, flags: &TableFlags) -> f64 {
        let penalties = &self.config.penalties;
        let deductions = [
            (flags.has_high_missing, penalties.high_missing),
            (flags.has_duplicates, penalties.duplicates),
            (flags.has_constant_columns, penalties.constant_columns),
            (
                flags.has_high_cardinality_categoricals,
                penalties.high_cardinality,
            ),
            (flags.has_many_zero_values, penalties.many_zero_values),
        ];

        let score: f64 = 100.0
            - deductions
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, penalty)| penalty)
                .sum::<f64>();

        if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) }
    }
}
