//! Log lines for trial table reads and writes
//!
//! Every loader and exporter reports the file it touches and the number of
//! rows moved, so a `score` or `report` run leaves a trace of which tables
//! fed it.

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Direction of a table transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableIo {
    /// Loading a table from disk
    Read,
    /// Exporting a table to disk
    Write,
}

impl fmt::Display for TableIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "Reading",
            Self::Write => "Writing",
        })
    }
}

/// Log the start of a table transfer, e.g. "Writing parquet table scored.parquet"
pub fn log_table_start(io: TableIo, format: &str, path: &Path) {
    log::info!("{io} {format} table {}", path.display());
}

/// Log a finished table transfer with its row count
pub fn log_table_complete(io: TableIo, path: &Path, rows: usize, elapsed: Option<Duration>) {
    let verb = match io {
        TableIo::Read => "Loaded",
        TableIo::Write => "Exported",
    };
    match elapsed {
        Some(duration) => log::info!("{verb} {rows} rows ({}) in {duration:?}", path.display()),
        None => log::info!("{verb} {rows} rows ({})", path.display()),
    }
}

/// Log that an optional table is absent from a data directory
pub fn log_missing_table(path: &Path) {
    log::warn!(
        "Optional table not found, continuing without it: {}",
        path.display()
    );
}
