//! Quality evaluation configuration.
//!
//! All thresholds and score penalties used by the summary estimator and the
//! table inspector live here. Defaults are documented on each `Default`
//! impl and are part of the observable behaviour of the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::QualityError;

/// Score deductions applied by the summary estimator (0-1 scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPenalties {
    pub too_few_rows: f64,
    pub too_many_columns: f64,
    pub too_many_missing: f64,
    pub no_numeric_columns: f64,
    pub no_categorical_columns: f64,
}

impl Default for SummaryPenalties {
    fn default() -> Self {
        Self {
            too_few_rows: 0.2,
            too_many_columns: 0.1,
            too_many_missing: 0.1,
            no_numeric_columns: 0.1,
            no_categorical_columns: 0.05,
        }
    }
}

/// Summary estimator thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Fewer rows than this sets `too_few_rows`
    pub min_rows: u64,
    /// More columns than this sets `too_many_columns`
    pub max_columns: u64,
    /// A max missing share above this sets `too_many_missing` (0.0-1.0)
    pub missing_limit: f64,
    /// Multiplier for the proportional missing-share deduction
    pub missing_share_weight: f64,
    /// Per-flag score deductions
    pub penalties: SummaryPenalties,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_rows: 1000,
            max_columns: 100,
            missing_limit: 0.5,
            missing_share_weight: 1.0,
            penalties: SummaryPenalties::default(),
        }
    }
}

/// Score deductions applied by the table inspector (0-100 scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePenalties {
    pub high_missing: f64,
    pub duplicates: f64,
    pub constant_columns: f64,
    pub high_cardinality: f64,
    pub many_zero_values: f64,
}

impl Default for TablePenalties {
    fn default() -> Self {
        Self {
            high_missing: 20.0,
            duplicates: 15.0,
            constant_columns: 10.0,
            high_cardinality: 10.0,
            many_zero_values: 5.0,
        }
    }
}

/// Table inspector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// A column missing share above this is "high missing" (0.0-1.0)
    pub high_missing_limit: f64,
    /// Categorical distinct/rows ratio above this is "high cardinality" (0.0-1.0)
    pub cardinality_limit: f64,
    /// Distinct count must also exceed this floor to flag high cardinality
    pub cardinality_floor: u64,
    /// A numeric zero share above this is "many zeros" (0.0-1.0)
    pub zero_limit: f64,
    /// Minimum score (inclusive) for `ok_for_model` (0-100)
    pub pass_score: f64,
    /// Per-flag score deductions
    pub penalties: TablePenalties,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            high_missing_limit: 0.3,
            cardinality_limit: 0.9,
            // Keeps small tables from being flagged just because every
            // label happens to be unique.
            cardinality_floor: 50,
            zero_limit: 0.5,
            pass_score: 70.0,
            penalties: TablePenalties::default(),
        }
    }
}

/// Complete engine configuration shared by both evaluation variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Summary estimator settings
    pub summary: SummaryConfig,
    /// Table inspector settings
    pub table: TableConfig,
}

/// Validation errors for quality configuration.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    ShareOutOfRange { name: &'static str, value: f64 },
    #[error("pass_score must be between 0 and 100, got {0}")]
    InvalidPassScore(f64),
    #[error("penalty {name} must be finite and non-negative, got {value}")]
    InvalidPenalty { name: &'static str, value: f64 },
}

/// Clamps a share into [0, 1], warning when the input was out of range.
fn clamp_share(name: &str, value: f64) -> f64 {
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!("{} {} clamped to valid range [0.0, 1.0]", name, value);
    }
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn check_share(name: &'static str, value: f64) -> Result<(), ConfigValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigValidationError::ShareOutOfRange { name, value })
    }
}

fn check_penalty(name: &'static str, value: f64) -> Result<(), ConfigValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidPenalty { name, value })
    }
}

impl SummaryConfig {
    /// Builder method to set the minimum row count.
    pub fn with_min_rows(mut self, min_rows: u64) -> Self {
        self.min_rows = min_rows;
        self
    }

    /// Builder method to set the maximum column count.
    pub fn with_max_columns(mut self, max_columns: u64) -> Self {
        self.max_columns = max_columns;
        self
    }

    /// Builder method to set the missing share limit.
    pub fn with_missing_limit(mut self, limit: f64) -> Self {
        self.missing_limit = clamp_share("missing_limit", limit);
        self
    }

    /// Builder method to set the per-flag penalties.
    pub fn with_penalties(mut self, penalties: SummaryPenalties) -> Self {
        self.penalties = penalties;
        self
    }

    /// Validates thresholds and penalties.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_share("summary.missing_limit", self.missing_limit)?;
        check_penalty("summary.missing_share_weight", self.missing_share_weight)?;
        let p = &self.penalties;
        check_penalty("summary.too_few_rows", p.too_few_rows)?;
        check_penalty("summary.too_many_columns", p.too_many_columns)?;
        check_penalty("summary.too_many_missing", p.too_many_missing)?;
        check_penalty("summary.no_numeric_columns", p.no_numeric_columns)?;
        check_penalty("summary.no_categorical_columns", p.no_categorical_columns)?;
        Ok(())
    }
}

impl TableConfig {
    /// Builder method to set the high-missing column limit.
    pub fn with_high_missing_limit(mut self, limit: f64) -> Self {
        self.high_missing_limit = clamp_share("high_missing_limit", limit);
        self
    }

    /// Builder method to set the cardinality ratio limit.
    pub fn with_cardinality_limit(mut self, limit: f64) -> Self {
        self.cardinality_limit = clamp_share("cardinality_limit", limit);
        self
    }

    /// Builder method to set the absolute distinct-count floor.
    pub fn with_cardinality_floor(mut self, floor: u64) -> Self {
        self.cardinality_floor = floor;
        self
    }

    /// Builder method to set the zero share limit.
    pub fn with_zero_limit(mut self, limit: f64) -> Self {
        self.zero_limit = clamp_share("zero_limit", limit);
        self
    }

    /// Builder method to set the pass score.
    pub fn with_pass_score(mut self, score: f64) -> Self {
        if !(0.0..=100.0).contains(&score) {
            tracing::warn!("pass_score {} clamped to valid range [0, 100]", score);
        }
        self.pass_score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 100.0)
        };
        self
    }

    /// Builder method to set the per-flag penalties.
    pub fn with_penalties(mut self, penalties: TablePenalties) -> Self {
        self.penalties = penalties;
        self
    }

    /// Validates thresholds and penalties.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_share("table.high_missing_limit", self.high_missing_limit)?;
        check_share("table.cardinality_limit", self.cardinality_limit)?;
        check_share("table.zero_limit", self.zero_limit)?;
        if !(0.0..=100.0).contains(&self.pass_score) {
            return Err(ConfigValidationError::InvalidPassScore(self.pass_score));
        }
        let p = &self.penalties;
        check_penalty("table.high_missing", p.high_missing)?;
        check_penalty("table.duplicates", p.duplicates)?;
        check_penalty("table.constant_columns", p.constant_columns)?;
        check_penalty("table.high_cardinality", p.high_cardinality)?;
        check_penalty("table.many_zero_values", p.many_zero_values)?;
        Ok(())
    }
}

impl QualityConfig {
    /// Creates a new quality config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON text.
    ///
    /// Missing sections and fields fall back to their defaults. The result
    /// is not validated, so overrides can still be layered on top before
    /// calling [`QualityConfig::validate`].
    ///
    /// # Errors
    /// Returns [`QualityError::Serialization`] if the text is not valid JSON
    /// or a field has the wrong type.
    pub fn from_json_str(text: &str) -> crate::error::Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| QualityError::serialization("Failed to parse quality configuration", e))
    }

    /// Builder method to replace the summary settings.
    pub fn with_summary(mut self, summary: SummaryConfig) -> Self {
        self.summary = summary;
        self
    }

    /// Builder method to replace the table settings.
    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error if any share is outside [0, 1], the pass score is
    /// outside [0, 100] or a penalty is negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.summary.validate()?;
        self.table.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_config_default() {
        let config = SummaryConfig::default();
        assert_eq!(config.min_rows, 1000);
        assert_eq!(config.max_columns, 100);
        assert_eq!(config.missing_limit, 0.5);
        assert_eq!(config.missing_share_weight, 1.0);
        assert_eq!(config.penalties.too_few_rows, 0.2);
        assert_eq!(config.penalties.no_categorical_columns, 0.05);
    }

    #[test]
    fn test_table_config_default() {
        let config = TableConfig::default();
        assert_eq!(config.high_missing_limit, 0.3);
        assert_eq!(config.cardinality_limit, 0.9);
        assert_eq!(config.cardinality_floor, 50);
        assert_eq!(config.zero_limit, 0.5);
        assert_eq!(config.pass_score, 70.0);
        assert_eq!(config.penalties.high_missing, 20.0);
        assert_eq!(config.penalties.duplicates, 15.0);
        assert_eq!(config.penalties.many_zero_values, 5.0);
    }

    #[test]
    fn test_quality_config_builder() {
        let config = QualityConfig::new()
            .with_summary(
                SummaryConfig::default()
                    .with_min_rows(100)
                    .with_max_columns(200)
                    .with_missing_limit(0.3),
            )
            .with_table(
                TableConfig::default()
                    .with_high_missing_limit(0.5)
                    .with_cardinality_floor(5)
                    .with_pass_score(50.0),
            );

        assert_eq!(config.summary.min_rows, 100);
        assert_eq!(config.summary.max_columns, 200);
        assert_eq!(config.summary.missing_limit, 0.3);
        assert_eq!(config.table.high_missing_limit, 0.5);
        assert_eq!(config.table.cardinality_floor, 5);
        assert_eq!(config.table.pass_score, 50.0);
    }

    #[test]
    fn test_threshold_clamping() {
        let table = TableConfig::default()
            .with_zero_limit(1.5)
            .with_cardinality_limit(-0.5)
            .with_pass_score(140.0);

        assert_eq!(table.zero_limit, 1.0);
        assert_eq!(table.cardinality_limit, 0.0);
        assert_eq!(table.pass_score, 100.0);

        let summary = SummaryConfig::default().with_missing_limit(f64::NAN);
        assert_eq!(summary.missing_limit, 0.0);
    }

    #[test]
    fn test_from_json_str_fills_defaults() {
        let config =
            QualityConfig::from_json_str(r#"{"table": {"pass_score": 55, "zero_limit": 0.8}}"#)
                .unwrap();

        assert_eq!(config.table.pass_score, 55.0);
        assert_eq!(config.table.zero_limit, 0.8);
        assert_eq!(config.table.cardinality_floor, 50);
        assert_eq!(config.summary, SummaryConfig::default());
    }

    #[test]
    fn test_from_json_str_rejects_bad_json() {
        let err = QualityConfig::from_json_str(r#"{"table": {"pass_score": "high"}}"#).unwrap_err();
        assert!(matches!(err, QualityError::Serialization { .. }));
        assert!(err.to_string().contains("Failed to parse quality configuration"));

        assert!(QualityConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_validate_success() {
        assert!(QualityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_share_out_of_range() {
        // Set the field directly to bypass builder clamping
        let config = QualityConfig {
            table: TableConfig {
                zero_limit: 1.5,
                ..TableConfig::default()
            },
            ..QualityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ShareOutOfRange {
                name: "table.zero_limit",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_invalid_pass_score() {
        let config = QualityConfig {
            table: TableConfig {
                pass_score: -1.0,
                ..TableConfig::default()
            },
            ..QualityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidPassScore(_))
        ));
    }

    #[test]
    fn test_validate_negative_penalty() {
        let config = QualityConfig {
            summary: SummaryConfig {
                penalties: SummaryPenalties {
                    too_few_rows: -0.2,
                    ..SummaryPenalties::default()
                },
                ..SummaryConfig::default()
            },
            ..QualityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidPenalty {
                name: "summary.too_few_rows",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_override() {
        let json = r#"{"table": {"pass_score": 50, "penalties": {"duplicates": 30}}}"#;
        let config: QualityConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.table.pass_score, 50.0);
        assert_eq!(config.table.penalties.duplicates, 30.0);
        assert_eq!(config.table.penalties.high_missing, 20.0);
        assert_eq!(config.table.zero_limit, 0.5);
        assert_eq!(config.summary, SummaryConfig::default());
    }

    #[test]
    fn test_quality_config_serde_roundtrip() {
        let config = QualityConfig::new()
            .with_table(TableConfig::default().with_zero_limit(0.75));

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: QualityConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }
}
