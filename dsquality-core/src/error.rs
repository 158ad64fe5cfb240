//! Error types for dataset quality evaluation.
//!
//! The engine itself only ever produces [`QualityError::EmptyDataset`] and
//! [`QualityError::InvalidInput`]. The remaining variants belong to the
//! plumbing around it (CSV loading, configuration files, report output).

use thiserror::Error;

/// Main error type for dsquality operations.
#[derive(Debug, Error)]
pub enum QualityError {
    /// The table has no rows or no columns, so there is nothing to inspect
    #[error("Dataset is empty: {n_rows} rows x {n_cols} columns")]
    EmptyDataset { n_rows: usize, n_cols: usize },

    /// Caller supplied inconsistent or out-of-range input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration or logging setup error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Delimited text could not be read
    #[error("CSV parsing failed: {context}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with QualityError
pub type Result<T> = std::result::Result<T, QualityError>;

impl QualityError {
    /// Creates an empty dataset error for the given shape
    pub fn empty_dataset(n_rows: usize, n_cols: usize) -> Self {
        Self::EmptyDataset { n_rows, n_cols }
    }

    /// Creates an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a CSV error with context
    pub fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns true for the empty dataset error kind.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_message() {
        let error = QualityError::empty_dataset(0, 3);
        assert_eq!(error.to_string(), "Dataset is empty: 0 rows x 3 columns");
        assert!(error.is_empty_dataset());
    }

    #[test]
    fn test_error_creation() {
        let error = QualityError::invalid_input("max_missing_share must be finite");
        assert!(error.to_string().contains("max_missing_share must be finite"));
        assert!(!error.is_empty_dataset());

        let error = QualityError::configuration("pass_score out of range");
        assert!(error.to_string().contains("pass_score out of range"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let error = QualityError::io("Failed to open missing.csv", source);

        assert!(error.to_string().contains("Failed to open missing.csv"));
        assert!(error.source().is_some());
    }
}
