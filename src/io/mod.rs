//! Loading and exporting trial tables
//!
//! File loads are a separate upstream step from scoring: loaders return
//! typed records, and scoring never touches the filesystem.

pub mod convert;
pub mod csv;
pub mod export;
pub mod tables;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{PatientRecord, QueryRecord, SiteRecord};
use crate::utils::{ensure_directory, log_missing_table, validate_directory};

pub use convert::{
    base_patients_to_record_batch, patients_to_record_batch, queries_to_record_batch,
    site_summaries_to_record_batch, sites_to_record_batch,
};
pub use csv::{
    load_patients_csv, load_queries_csv, load_sites_csv, read_csv_batches, read_csv_table,
};
pub use export::{write_csv, write_parquet, write_summary_json};
pub use tables::{
    base_patients_from_batch, patients_from_batch, queries_from_batch, sites_from_batch,
};

/// Patient table file name inside a data directory
pub const PATIENTS_FILE: &str = "patients.csv";
/// Site roster file name inside a data directory
pub const SITES_FILE: &str = "sites.csv";
/// Query log file name inside a data directory
pub const QUERIES_FILE: &str = "queries.csv";

/// The three tables of a trial data directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialDataset {
    /// Patient table
    pub patients: Vec<PatientRecord>,
    /// Site roster, empty when the directory has none
    pub sites: Vec<SiteRecord>,
    /// Query log, empty when the directory has none
    pub queries: Vec<QueryRecord>,
}

fn optional_table<T>(path: PathBuf, load: impl Fn(&Path) -> Result<Vec<T>>) -> Result<Vec<T>> {
    if path.is_file() {
        load(&path)
    } else {
        log_missing_table(&path);
        Ok(Vec::new())
    }
}

/// Load a data directory
///
/// `patients.csv` is required; `sites.csv` and `queries.csv` are optional.
pub fn load_dataset_dir(dir: &Path) -> Result<TrialDataset> {
    validate_directory(dir)?;
    Ok(TrialDataset {
        patients: load_patients_csv(&dir.join(PATIENTS_FILE))?,
        sites: optional_table(dir.join(SITES_FILE), load_sites_csv)?,
        queries: optional_table(dir.join(QUERIES_FILE), load_queries_csv)?,
    })
}

/// Write all three tables as CSV into `dir`, creating it when missing
///
/// Patients are written with base fields only.
pub fn write_dataset_dir(
    dir: &Path,
    patients: &[PatientRecord],
    sites: &[SiteRecord],
    queries: &[QueryRecord],
) -> Result<()> {
    ensure_directory(dir)?;
    write_csv(&base_patients_to_record_batch(patients)?, &dir.join(PATIENTS_FILE))?;
    write_csv(&sites_to_record_batch(sites)?, &dir.join(SITES_FILE))?;
    write_csv(&queries_to_record_batch(queries)?, &dir.join(QUERIES_FILE))?;
    Ok(())
}
