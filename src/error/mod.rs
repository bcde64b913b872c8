//! Error handling for trial data loading, scoring and export.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for trial data operations
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error processing Arrow data (CSV reading, batch construction)
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing Parquet output
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error converting between records and record batches
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required column is absent from an input table
    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    /// A value could not be interpreted
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Column or field name
        field: String,
        /// What was wrong with it
        message: String,
    },
}

impl TrialError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid value error for a named field
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_arrow::Error> for TrialError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for trial data operations
pub type Result<T> = std::result::Result<T, TrialError>;
