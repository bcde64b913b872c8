//! Record slices to Arrow record batches via `serde_arrow`
//!
//! Each table has a fixed field list, so empty slices and all-null columns
//! still produce the full, typed schema. Dates are written as ISO text.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, FieldRef};
use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::algorithm::scoring::columnar::DERIVED_COLUMNS;
use crate::error::Result;
use crate::models::{PatientRecord, QueryRecord, SiteRecord, SiteSummary};

const PATIENT_COUNTERS: [&str; 10] = [
    "total_visits_expected",
    "visits_completed",
    "missing_visits",
    "total_queries",
    "open_queries",
    "queries_resolved",
    "non_conformant_data",
    "safety_issues",
    "adverse_events",
    "protocol_deviations",
];

fn field(name: &str, data_type: DataType, nullable: bool) -> FieldRef {
    Arc::new(Field::new(name, data_type, nullable))
}

fn text(name: &str) -> FieldRef {
    field(name, DataType::Utf8, true)
}

fn patient_fields() -> Vec<FieldRef> {
    let mut fields = vec![
        field("patient_id", DataType::Utf8, false),
        text("site_id"),
        text("subject_status"),
        text("disease"),
        text("enrollment_date"),
    ];
    fields.extend(
        PATIENT_COUNTERS
            .iter()
            .map(|name| field(name, DataType::Int64, true)),
    );
    fields.extend([
        field("forms_verified", DataType::Boolean, true),
        field("forms_signed", DataType::Boolean, true),
        text("clean_status"),
        field("dqi_score", DataType::Float64, true),
        text("risk_level"),
    ]);
    fields
}

fn site_fields() -> Vec<FieldRef> {
    vec![
        field("site_id", DataType::Utf8, false),
        text("site_name"),
        text("region"),
    ]
}

fn site_summary_fields() -> Vec<FieldRef> {
    let mut fields = site_fields();
    fields.extend([
        field("total_patients_enrolled", DataType::UInt64, false),
        field("clean_patients", DataType::UInt64, false),
        field("clean_percentage", DataType::Float64, false),
        field("avg_dqi", DataType::Float64, false),
        field("total_open_queries", DataType::Int64, false),
        field("total_safety_issues", DataType::Int64, false),
        field("total_adverse_events", DataType::Int64, false),
        field("performance_status", DataType::Utf8, false),
        field("priority_level", DataType::Utf8, false),
        field("needs_attention", DataType::Boolean, false),
    ]);
    fields
}

fn query_fields() -> Vec<FieldRef> {
    vec![
        field("query_id", DataType::Utf8, false),
        field("patient_id", DataType::Utf8, false),
        text("site_id"),
        text("disease"),
        text("query_type"),
        text("query_priority"),
        field("query_status", DataType::Utf8, false),
        text("created_date"),
        text("resolved_date"),
        field("query_age_days", DataType::Int64, true),
        text("assigned_to"),
    ]
}

fn to_record_batch<T: Serialize>(fields: &[FieldRef], items: &[T]) -> Result<RecordBatch> {
    Ok(serde_arrow::to_record_batch(fields, &items)?)
}

/// Patient table, base and derived fields
pub fn patients_to_record_batch(patients: &[PatientRecord]) -> Result<RecordBatch> {
    to_record_batch(&patient_fields(), patients)
}

/// Patient table without the derived columns
pub fn base_patients_to_record_batch(patients: &[PatientRecord]) -> Result<RecordBatch> {
    let batch = patients_to_record_batch(patients)?;
    let schema = batch.schema();
    let keep: Vec<usize> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !DERIVED_COLUMNS.contains(&field.name().as_str()))
        .map(|(idx, _)| idx)
        .collect();
    Ok(batch.project(&keep)?)
}

/// Site roster
pub fn sites_to_record_batch(sites: &[SiteRecord]) -> Result<RecordBatch> {
    to_record_batch(&site_fields(), sites)
}

/// Site summary table
pub fn site_summaries_to_record_batch(summaries: &[SiteSummary]) -> Result<RecordBatch> {
    to_record_batch(&site_summary_fields(), summaries)
}

/// Query log
pub fn queries_to_record_batch(queries: &[QueryRecord]) -> Result<RecordBatch> {
    to_record_batch(&query_fields(), queries)
}
