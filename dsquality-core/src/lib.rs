//! Core library for dsquality.
//!
//! Decides whether a tabular dataset is fit for model training. The crate
//! holds the quality engine, the in-memory table model and its CSV loader,
//! descriptive overview helpers, and the small amount of plumbing (errors,
//! logging, request counters) shared with the `dsquality` binary.
//!
//! # Architecture
//! - [`table`]: immutable column-oriented [`Table`] plus CSV loading
//! - [`quality`]: summary estimator, table inspector and engine facade
//! - [`metrics`]: observer interface the caller updates after each call
//!
//! The engine holds only configuration. It never mutates its input and
//! never accumulates state across calls.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod quality;
pub mod table;

// Re-export commonly used types
pub use error::{QualityError, Result};
pub use logging::init_logging;
pub use metrics::{
    EvaluationEvent, EvaluationObserver, EvaluationOutcome, MetricsSnapshot, RequestStats,
};
pub use quality::{
    DatasetOverview, QualityConfig, QualityEngine, QualityResult, SummaryFlags, SummaryInput,
    TableFlags, estimate_from_summary, inspect_table,
};
pub use table::{Column, ColumnKind, ColumnValues, LoadOptions, Table, load_csv, write_csv};
