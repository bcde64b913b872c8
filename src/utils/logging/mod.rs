//! Logging utilities for output and progress tracking

pub mod log;
pub mod progress;

pub use log::{TableIo, log_missing_table, log_table_complete, log_table_start};
pub use progress::{create_main_progress_bar, finish_progress_bar, optional_progress_bar};
