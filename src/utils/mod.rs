//! Shared utilities
//!
//! Arrow value extraction, logging helpers and progress bars.

use std::path::Path;

use crate::error::{Result, TrialError};

pub mod arrow_utils;
pub mod logging;

pub use logging::{TableIo, log_missing_table, log_table_complete, log_table_start};

/// Validates that a directory exists and is a directory
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(TrialError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", dir.display()),
        )));
    }
    Ok(())
}

/// Create a directory and its parents if missing
pub fn ensure_directory(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}
