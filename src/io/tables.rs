//! Typed records from Arrow record batches
//!
//! Columns are looked up by name. A missing optional column reads as `None`
//! for every row; a missing id column is an error. A patient counter that is
//! present but unreadable reads as `None` and is listed in
//! `PatientRecord::malformed_fields`. Derived patient columns are read by
//! [`patients_from_batch`] and ignored by [`base_patients_from_batch`];
//! unrecognized derived labels read as `None`.

use std::str::FromStr;

use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::debug;
use rustc_hash::FxHashMap;

use crate::error::{Result, TrialError};
use crate::models::{
    CleanStatus, PatientRecord, QueryPriority, QueryRecord, QueryStatus, RiskLevel, SiteRecord,
};
use crate::utils::arrow_utils::{
    arrow_array_to_bool, arrow_array_to_date, arrow_array_to_f64, arrow_array_to_i64,
    arrow_array_to_string, get_column, is_blank,
};

/// Date columns in any of the tables
const DATE_COLUMNS: [&str; 4] = [
    "enrollment_date",
    "created_date",
    "query_created_date",
    "resolved_date",
];

/// Reads single cells by column name
struct ColumnReader {
    columns: FxHashMap<String, ArrayRef>,
}

impl ColumnReader {
    fn new(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut columns = FxHashMap::default();
        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            let column = if DATE_COLUMNS.contains(&field.name().as_str())
                && matches!(field.data_type(), DataType::Timestamp(_, _))
            {
                cast(column, &DataType::Date32)?
            } else {
                column.clone()
            };
            columns.insert(field.name().clone(), column);
        }
        Ok(Self { columns })
    }

    fn string(&self, name: &str, row: usize) -> Option<String> {
        self.columns
            .get(name)
            .and_then(|c| arrow_array_to_string(c, row))
            .filter(|s| !s.trim().is_empty())
    }

    fn i64(&self, name: &str, row: usize) -> Option<i64> {
        self.columns.get(name).and_then(|c| arrow_array_to_i64(c, row))
    }

    /// Read a counter, recording it in `malformed` when the cell is set but unreadable
    fn counter(&self, name: &str, row: usize, malformed: &mut Vec<String>) -> Option<i64> {
        let column = self.columns.get(name)?;
        let value = arrow_array_to_i64(column, row);
        if value.is_none() && !is_blank(column, row) {
            malformed.push(name.to_string());
        }
        value
    }

    fn f64(&self, name: &str, row: usize) -> Option<f64> {
        self.columns.get(name).and_then(|c| arrow_array_to_f64(c, row))
    }

    fn bool(&self, name: &str, row: usize) -> Option<bool> {
        self.columns.get(name).and_then(|c| arrow_array_to_bool(c, row))
    }

    fn date(&self, name: &str, row: usize) -> Option<NaiveDate> {
        self.columns.get(name).and_then(|c| arrow_array_to_date(c, row))
    }

    fn label<T>(&self, name: &str, row: usize) -> Result<Option<T>>
    where
        T: FromStr<Err = TrialError>,
    {
        self.string(name, row).map(|s| s.parse()).transpose()
    }

    /// Read a derived label, treating unrecognized values as absent
    fn derived_label<T>(&self, name: &str, row: usize) -> Option<T>
    where
        T: FromStr<Err = TrialError>,
    {
        self.label(name, row).unwrap_or_else(|e| {
            debug!("Ignoring derived value in row {row}: {e}");
            None
        })
    }

    fn id(&self, name: &str, row: usize) -> Result<String> {
        self.string(name, row).ok_or_else(|| {
            TrialError::invalid_value(name, format!("missing value in row {row}"))
        })
    }
}

fn read_patients(batch: &RecordBatch, with_derived: bool) -> Result<Vec<PatientRecord>> {
    get_column(batch, "patient_id")?;
    let reader = ColumnReader::new(batch)?;

    (0..batch.num_rows())
        .map(|row| {
            let mut malformed = Vec::new();
            let mut counter = |name: &str| reader.counter(name, row, &mut malformed);
            let total_visits_expected = counter("total_visits_expected");
            let visits_completed = counter("visits_completed");
            let missing_visits = counter("missing_visits");
            let total_queries = counter("total_queries");
            let open_queries = counter("open_queries");
            let queries_resolved = counter("queries_resolved");
            let non_conformant_data = counter("non_conformant_data");
            let safety_issues = counter("safety_issues");
            let adverse_events = counter("adverse_events");
            let protocol_deviations = counter("protocol_deviations");

            let mut patient = PatientRecord {
                patient_id: reader.id("patient_id", row)?,
                site_id: reader.string("site_id", row),
                subject_status: reader.string("subject_status", row),
                disease: reader.string("disease", row),
                enrollment_date: reader.date("enrollment_date", row),
                total_visits_expected,
                visits_completed,
                missing_visits,
                total_queries,
                open_queries,
                queries_resolved,
                non_conformant_data,
                safety_issues,
                adverse_events,
                protocol_deviations,
                forms_verified: reader.bool("forms_verified", row),
                forms_signed: reader.bool("forms_signed", row),
                malformed_fields: malformed,
                ..Default::default()
            };

            if with_derived {
                patient.clean_status = reader.derived_label::<CleanStatus>("clean_status", row);
                patient.dqi_score = reader.f64("dqi_score", row);
                patient.risk_level = reader.derived_label::<RiskLevel>("risk_level", row);
            }

            Ok(patient)
        })
        .collect()
}

/// Read patients including any derived columns present
pub fn patients_from_batch(batch: &RecordBatch) -> Result<Vec<PatientRecord>> {
    read_patients(batch, true)
}

/// Read patients, ignoring derived columns
pub fn base_patients_from_batch(batch: &RecordBatch) -> Result<Vec<PatientRecord>> {
    read_patients(batch, false)
}

/// Read the site roster
///
/// Extra columns (for example precomputed summaries) are ignored.
pub fn sites_from_batch(batch: &RecordBatch) -> Result<Vec<SiteRecord>> {
    get_column(batch, "site_id")?;
    let reader = ColumnReader::new(batch)?;

    (0..batch.num_rows())
        .map(|row| {
            Ok(SiteRecord {
                site_id: reader.id("site_id", row)?,
                site_name: reader.string("site_name", row),
                region: reader.string("region", row),
            })
        })
        .collect()
}

/// Read the query log
///
/// `created_date` falls back to a `query_created_date` column.
pub fn queries_from_batch(batch: &RecordBatch) -> Result<Vec<QueryRecord>> {
    get_column(batch, "query_id")?;
    get_column(batch, "query_status")?;
    let reader = ColumnReader::new(batch)?;

    (0..batch.num_rows())
        .map(|row| {
            let query_status = reader
                .label::<QueryStatus>("query_status", row)?
                .ok_or_else(|| {
                    TrialError::invalid_value("query_status", format!("missing value in row {row}"))
                })?;

            Ok(QueryRecord {
                query_id: reader.id("query_id", row)?,
                patient_id: reader.string("patient_id", row).unwrap_or_default(),
                site_id: reader.string("site_id", row),
                disease: reader.string("disease", row),
                query_type: reader.string("query_type", row),
                query_priority: reader.label::<QueryPriority>("query_priority", row)?,
                query_status,
                created_date: reader
                    .date("created_date", row)
                    .or_else(|| reader.date("query_created_date", row)),
                resolved_date: reader.date("resolved_date", row),
                query_age_days: reader.i64("query_age_days", row),
                assigned_to: reader.string("assigned_to", row),
            })
        })
        .collect()
}
