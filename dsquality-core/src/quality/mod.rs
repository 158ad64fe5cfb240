//! Dataset quality evaluation.
//!
//! Two variants share one [`QualityConfig`]:
//! - **Summary estimate**: coarse verdict from aggregate counts, scored 0-1
//! - **Table inspection**: exact per-column diagnostics over an in-memory
//!   [`Table`](crate::table::Table), scored 0-100
//!
//! The scores of the two variants are on different scales and are not
//! comparable. Both are pure: the same input always yields the same output.
//!
//! # Example
//! ```rust
//! use dsquality_core::quality::inspect_table;
//! use dsquality_core::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::from_f64s("amount", &[3.0, 0.0, 7.5]),
//!     Column::from_strs("region", &["north", "south", "east"]),
//! ])?;
//! let result = inspect_table(&table)?;
//! assert!(result.ok_for_model);
//! # Ok::<(), dsquality_core::QualityError>(())
//! ```

mod config;
mod engine;
mod inspector;
mod models;
mod overview;
mod profile;
mod summary;
mod uniqueness;

pub use config::{
    ConfigValidationError, QualityConfig, SummaryConfig, SummaryPenalties, TableConfig,
    TablePenalties,
};
pub use engine::{QualityEngine, estimate_from_summary, inspect_table};
pub use inspector::TableInspector;
pub use models::{ColumnProfile, DatasetShape, QualityResult, SummaryFlags, TableFlags};
pub use overview::{
    CategoricalSummary, DEFAULT_TOP_K, DatasetOverview, MissingDetail, MissingInfo, MissingRow,
    NumericSummary, ProblematicColumn, ValueCount, missing_table, problematic_columns,
};
pub use profile::{profile_column, profile_columns};
pub use summary::{SummaryEstimator, SummaryInput};
pub use uniqueness::count_duplicate_rows;
