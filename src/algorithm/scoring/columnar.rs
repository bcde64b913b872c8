//! Scoring directly over Arrow record batches
//!
//! Input batches come from the flat-file loaders and may carry stale derived
//! columns; those are dropped and replaced by freshly computed ones appended
//! at the end of the schema.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;

use crate::algorithm::scoring::batch::score_columns;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::io::tables::base_patients_from_batch;

/// Name of the derived clean-status column
pub const CLEAN_STATUS_COLUMN: &str = "clean_status";
/// Name of the derived DQI column
pub const DQI_SCORE_COLUMN: &str = "dqi_score";
/// Name of the derived risk-level column
pub const RISK_LEVEL_COLUMN: &str = "risk_level";

/// Columns computed by scoring
pub const DERIVED_COLUMNS: [&str; 3] = [CLEAN_STATUS_COLUMN, DQI_SCORE_COLUMN, RISK_LEVEL_COLUMN];

/// Score a patient record batch
///
/// All non-derived columns are kept as they are, in their original order.
pub fn score_record_batch(batch: &RecordBatch, config: &ScoringConfig) -> Result<RecordBatch> {
    let patients = base_patients_from_batch(batch)?;
    let scored = score_columns(&patients, config);

    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(schema.fields().len() + 3);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len() + 3);

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        if DERIVED_COLUMNS.contains(&field.name().as_str()) {
            continue;
        }
        fields.push(Arc::clone(field));
        columns.push(Arc::clone(column));
    }

    let clean_status: ArrayRef = Arc::new(StringArray::from_iter_values(
        scored.clean_status.iter().map(|s| s.as_str()),
    ));
    let dqi_score: ArrayRef = Arc::new(Float64Array::from(scored.dqi_score));
    let risk_level: ArrayRef = Arc::new(StringArray::from_iter_values(
        scored.risk_level.iter().map(|r| r.as_str()),
    ));

    fields.push(Arc::new(Field::new(CLEAN_STATUS_COLUMN, DataType::Utf8, false)));
    columns.push(clean_status);
    fields.push(Arc::new(Field::new(DQI_SCORE_COLUMN, DataType::Float64, false)));
    columns.push(dqi_score);
    fields.push(Arc::new(Field::new(RISK_LEVEL_COLUMN, DataType::Utf8, false)));
    columns.push(risk_level);

    let scored_schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(scored_schema), columns)?)
}

/// Score several record batches
///
/// Each batch is scored independently and may run on its own thread; the
/// output keeps the input order.
pub fn score_record_batches(
    batches: &[RecordBatch],
    config: &ScoringConfig,
) -> Result<Vec<RecordBatch>> {
    batches
        .par_iter()
        .map(|batch| score_record_batch(batch, config))
        .collect()
}
