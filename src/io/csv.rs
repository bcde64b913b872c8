//! CSV loading with Arrow schema inference

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::io::tables::{patients_from_batch, queries_from_batch, sites_from_batch};
use crate::models::{PatientRecord, QueryRecord, SiteRecord};
use crate::utils::{TableIo, log_table_complete, log_table_start};

/// Rows per batch when reading CSV files
pub const CSV_BATCH_SIZE: usize = 8192;

/// Read a CSV file with a header row into record batches
///
/// The schema is inferred from the whole file, so every batch shares it.
pub fn read_csv_batches(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let start = Instant::now();
    log_table_start(TableIo::Read, "CSV", path);

    let mut file = File::open(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_batch_size(CSV_BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_table_complete(TableIo::Read, path, rows, Some(start.elapsed()));
    Ok((schema, batches))
}

/// Read a CSV file with a header row into a single record batch
pub fn read_csv_table(path: &Path) -> Result<RecordBatch> {
    let (schema, batches) = read_csv_batches(path)?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Load the patient table
pub fn load_patients_csv(path: &Path) -> Result<Vec<PatientRecord>> {
    patients_from_batch(&read_csv_table(path)?)
}

/// Load the site roster
pub fn load_sites_csv(path: &Path) -> Result<Vec<SiteRecord>> {
    sites_from_batch(&read_csv_table(path)?)
}

/// Load the query log
pub fn load_queries_csv(path: &Path) -> Result<Vec<QueryRecord>> {
    queries_from_batch(&read_csv_table(path)?)
}
