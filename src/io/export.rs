//! Writers for record batches and summaries

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::Serialize;

use crate::error::Result;
use crate::utils::{TableIo, log_table_complete, log_table_start};

/// Write a record batch as CSV with a header row
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    log_table_start(TableIo::Write, "CSV", path);
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    log_table_complete(TableIo::Write, path, batch.num_rows(), None);
    Ok(())
}

/// Write a record batch as a Snappy-compressed Parquet file
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    log_table_start(TableIo::Write, "parquet", path);
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    log_table_complete(TableIo::Write, path, batch.num_rows(), None);
    Ok(())
}

/// Write a serializable summary as pretty-printed JSON
pub fn write_summary_json<T: Serialize + ?Sized>(summary: &T, path: &Path) -> Result<()> {
    log::info!("Writing summary {}", path.display());
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}
