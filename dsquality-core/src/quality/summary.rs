//! Coarse quality estimate from aggregate counts.
//!
//! No raw data is involved: the verdict is a fixed-threshold heuristic over
//! five numbers supplied by the caller.

use serde::{Deserialize, Serialize};

use super::config::SummaryConfig;
use super::models::{DatasetShape, QualityResult, SummaryFlags};
use crate::error::{QualityError, Result};

/// Aggregate description of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryInput {
    /// Number of rows
    pub n_rows: u64,
    /// Number of columns
    pub n_cols: u64,
    /// Largest per-column missing share (0.0-1.0)
    pub max_missing_share: f64,
    /// Columns holding numeric values
    pub numeric_cols: u64,
    /// Columns holding text / categorical values
    pub categorical_cols: u64,
}

impl SummaryInput {
    /// Creates a summary input.
    pub fn new(
        n_rows: u64,
        n_cols: u64,
        max_missing_share: f64,
        numeric_cols: u64,
        categorical_cols: u64,
    ) -> Self {
        Self {
            n_rows,
            n_cols,
            max_missing_share,
            numeric_cols,
            categorical_cols,
        }
    }

    /// Strict validation for callers that want to reject bad input.
    ///
    /// The estimator itself never calls this; it proceeds best-effort.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_missing_share) {
            return Err(QualityError::invalid_input(format!(
                "max_missing_share must be between 0.0 and 1.0, got {}",
                self.max_missing_share
            )));
        }
        if self.typed_columns() > self.n_cols {
            return Err(QualityError::invalid_input(format!(
                "numeric_cols ({}) + categorical_cols ({}) exceeds n_cols ({})",
                self.numeric_cols, self.categorical_cols, self.n_cols
            )));
        }
        Ok(())
    }

    fn typed_columns(&self) -> u64 {
        self.numeric_cols.saturating_add(self.categorical_cols)
    }
}

/// Fixed-threshold estimator over [`SummaryInput`].
#[derive(Debug, Clone, Default)]
pub struct SummaryEstimator {
    config: SummaryConfig,
}

impl SummaryEstimator {
    /// Creates an estimator with the given thresholds.
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the estimator configuration.
    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Estimates quality from aggregate counts.
    ///
    /// Score = `1.0 - missing_share_weight * max_missing_share` minus the
    /// penalty of every flag that is set, clamped to [0, 1]. `ok_for_model`
    /// is true unless a hard flag is set.
    pub fn estimate(&self, input: &SummaryInput) -> QualityResult<SummaryFlags> {
        if input.typed_columns() > input.n_cols {
            tracing::warn!(
                "Summary input anomaly: numeric_cols ({}) + categorical_cols ({}) exceeds n_cols ({})",
                input.numeric_cols,
                input.categorical_cols,
                input.n_cols
            );
        }

        let missing_share = sanitize_share(input.max_missing_share);
        let config = &self.config;

        let flags = SummaryFlags {
            too_few_rows: input.n_rows < config.min_rows,
            too_many_columns: input.n_cols > config.max_columns,
            too_many_missing: missing_share > config.missing_limit,
            no_numeric_columns: input.numeric_cols == 0,
            no_categorical_columns: input.categorical_cols == 0,
        };

        let quality_score = self.score(&flags, missing_share);
        let ok_for_model = !flags.blocks_training();

        tracing::debug!(
            n_rows = input.n_rows,
            n_cols = input.n_cols,
            quality_score,
            ok_for_model,
            "Summary estimate computed"
        );

        QualityResult {
            ok_for_model,
            quality_score,
            flags,
            dataset_shape: DatasetShape {
                n_rows: input.n_rows,
                n_cols: input.n_cols,
            },
        }
    }

    fn score(&self, flags: &SummaryFlags, missing_share: f64) -> f64 {
        let penalties = &self.config.penalties;
        let deductions = [
            (flags.too_few_rows, penalties.too_few_rows),
            (flags.too_many_columns, penalties.too_many_columns),
            (flags.too_many_missing, penalties.too_many_missing),
            (flags.no_numeric_columns, penalties.no_numeric_columns),
            (flags.no_categorical_columns, penalties.no_categorical_columns),
        ];

        let score = deductions
            .iter()
            .filter(|(set, _)| *set)
            .fold(
                1.0 - self.config.missing_share_weight * missing_share,
                |score, (_, penalty)| score - penalty,
            );

        if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
    }
}

/// Clamps a caller-supplied share into [0, 1]; non-finite input counts as 1.0.
fn sanitize_share(value: f64) -> f64 {
    if (0.0..=1.0).contains(&value) {
        return value;
    }
    let sanitized = if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) };
    tracing::warn!(
        "max_missing_share {} outside [0.0, 1.0], using {}",
        value,
        sanitized
    );
    sanitized
}
