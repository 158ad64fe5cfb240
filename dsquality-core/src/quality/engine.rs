//! Quality engine facade.
//!
//! `QualityEngine` holds one [`QualityConfig`] and routes calls to the
//! summary estimator or the table inspector. It keeps no state between
//! calls.

use crate::Result;
use crate::table::Table;

use super::config::QualityConfig;
use super::inspector::TableInspector;
use super::models::{QualityResult, SummaryFlags, TableFlags};
use super::summary::{SummaryEstimator, SummaryInput};

/// Entry point for both evaluation variants.
///
/// # Example
///
/// ```rust
/// use dsquality_core::quality::{QualityEngine, SummaryInput};
///
/// let engine = QualityEngine::with_defaults();
/// let result = engine.estimate_from_summary(&SummaryInput::new(2000, 15, 0.2, 8, 7));
/// assert!(result.ok_for_model);
/// ```
#[derive(Debug, Clone)]
pub struct QualityEngine {
    config: QualityConfig,
    summary: SummaryEstimator,
    inspector: TableInspector,
}

impl QualityEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: QualityConfig) -> Self {
        Self {
            summary: SummaryEstimator::new(config.summary.clone()),
            inspector: TableInspector::new(config.table.clone()),
            config,
        }
    }

    /// Creates a new engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(QualityConfig::default())
    }

    /// Returns a reference to the engine configuration.
    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Coarse estimate from aggregate counts (score on a 0-1 scale).
    pub fn estimate_from_summary(&self, input: &SummaryInput) -> QualityResult<SummaryFlags> {
        self.summary.estimate(input)
    }

    /// Exact inspection of a materialised table (score on a 0-100 scale).
    ///
    /// # Errors
    /// Returns [`crate::QualityError::EmptyDataset`] for tables with zero rows
    /// or zero columns.
    pub fn inspect_table(&self, table: &Table) -> Result<QualityResult<TableFlags>> {
        self.inspector.inspect(table)
    }

    /// Inspects several named tables.
    ///
    /// Tables that fail inspection are logged and skipped rather than
    /// aborting the batch, so the returned list may be shorter than the input.
    pub fn inspect_all<'a>(
        &self,
        tables: &'a [(String, Table)],
    ) -> Vec<(&'a str, QualityResult<TableFlags>)> {
        let mut results = Vec::with_capacity(tables.len());
        for (name, table) in tables {
            match self.inspect_table(table) {
                Ok(result) => results.push((name.as_str(), result)),
                Err(e) => {
                    tracing::warn!("Quality inspection failed for table '{}': {}", name, e);
                }
            }
        }
        results
    }
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Estimates quality from aggregate counts using the default thresholds.
pub fn estimate_from_summary(
    n_rows: u64,
    n_cols: u64,
    max_missing_share: f64,
    numeric_cols: u64,
    categorical_cols: u64,
) -> QualityResult<SummaryFlags> {
    SummaryEstimator::default().estimate(&SummaryInput::new(
        n_rows,
        n_cols,
        max_missing_share,
        numeric_cols,
        categorical_cols,
    ))
}

/// Inspects a table using the default thresholds.
pub fn inspect_table(table: &Table) -> Result<QualityResult<TableFlags>> {
    TableInspector::default().inspect(table)
}
