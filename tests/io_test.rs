//! Tests for loading and exporting trial tables

mod utils;

use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array, StringArray};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tempfile::tempdir;
use trial_dqi::generator::{GeneratorConfig, generate};
use trial_dqi::io::{
    PATIENTS_FILE, QUERIES_FILE, SITES_FILE, load_dataset_dir, load_patients_csv,
    load_queries_csv, load_sites_csv, patients_to_record_batch, read_csv_table,
    site_summaries_to_record_batch, write_dataset_dir, write_parquet, write_summary_json,
};
use trial_dqi::{
    BatchSummary, CleanStatus, QueryStatus, ScoringConfig, TrialError, aggregate_sites,
    calculate_summary, classify_clean_status, score_patients, score_record_batch,
};
use utils::{date, fixture_patients, fixture_roster, write_file};

#[test]
fn test_flags_in_several_spellings() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        PATIENTS_FILE,
        "patient_id,site_id,missing_visits,open_queries,safety_issues,forms_verified,forms_signed\n\
         P1,S1,0,0,0,yes,no\n\
         P2,S1,0,0,0,no,no\n\
         P3,S2,0,0,0,TRUE,1\n",
    );

    let patients = load_patients_csv(&path).unwrap();
    let flags: Vec<(Option<bool>, Option<bool>)> = patients
        .iter()
        .map(|p| (p.forms_verified, p.forms_signed))
        .collect();
    assert_eq!(
        flags,
        vec![
            (Some(true), Some(false)),
            (Some(false), Some(false)),
            (Some(true), Some(true)),
        ]
    );

    let clean: Vec<CleanStatus> = patients.iter().map(classify_clean_status).collect();
    assert_eq!(
        clean,
        vec![CleanStatus::Clean, CleanStatus::NotClean, CleanStatus::Clean]
    );
    // Columns absent from the file read as None
    assert!(patients.iter().all(|p| p.total_visits_expected.is_none()));
}

#[test]
fn test_whole_float_counters_and_dates() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        PATIENTS_FILE,
        "patient_id,visits_completed,total_visits_expected,enrollment_date\n\
         P1,10.0,12.0,2024-03-10\n\
         P2,,12.0,\n",
    );

    let patients = load_patients_csv(&path).unwrap();
    assert_eq!(patients[0].visits_completed, Some(10));
    assert_eq!(patients[0].enrollment_date, Some(date(2024, 3, 10)));
    assert_eq!(patients[1].visits_completed, None);
    assert_eq!(patients[1].enrollment_date, None);
    assert_eq!(patients[1].site_id, None);
}

#[test]
fn test_missing_patient_id_column() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), PATIENTS_FILE, "site_id,open_queries\nS1,0\n");
    assert!(matches!(
        load_patients_csv(&path),
        Err(TrialError::MissingColumn(column)) if column == "patient_id"
    ));
}

#[test]
fn test_query_log_with_created_date_alias() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        QUERIES_FILE,
        "query_id,patient_id,query_status,query_priority,query_created_date,query_age_days\n\
         Q1,P1,Open,High,2024-05-01,10\n\
         Q2,P1,Closed,Low,2024-04-01,40\n",
    );

    let queries = load_queries_csv(&path).unwrap();
    assert_eq!(queries[0].query_status, QueryStatus::Open);
    assert_eq!(queries[0].created_date, Some(date(2024, 5, 1)));
    assert_eq!(queries[1].query_status, QueryStatus::Resolved);
}

#[test]
fn test_site_roster_ignores_extra_columns() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        SITES_FILE,
        "site_id,site_name,region,avg_dqi\nSite_B,Site B,West,81.2\nSite_A,,North,70.0\n",
    );

    let sites = load_sites_csv(&path).unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].site_name.as_deref(), Some("Site B"));
    assert_eq!(sites[1].site_name, None);
    assert_eq!(sites[1].region.as_deref(), Some("North"));
}

#[test]
fn test_generated_dataset_round_trip() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let dataset = generate(&GeneratorConfig {
        num_patients: 40,
        resolved_queries: 15,
        ..Default::default()
    })
    .unwrap();

    write_dataset_dir(&data_dir, &dataset.patients, &dataset.sites, &dataset.queries).unwrap();
    let loaded = load_dataset_dir(&data_dir).unwrap();

    assert_eq!(loaded.patients, dataset.patients);
    assert_eq!(loaded.sites, dataset.sites);
    assert_eq!(loaded.queries, dataset.queries);
}

#[test]
fn test_optional_tables_may_be_absent() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        PATIENTS_FILE,
        "patient_id,site_id,open_queries\nP1,S1,0\n",
    );

    let loaded = load_dataset_dir(dir.path()).unwrap();
    assert_eq!(loaded.patients.len(), 1);
    assert!(loaded.sites.is_empty());
    assert!(loaded.queries.is_empty());

    assert!(load_dataset_dir(&dir.path().join("missing")).is_err());
}

#[test]
fn test_scoring_loaded_table_replaces_stale_columns() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        PATIENTS_FILE,
        "patient_id,missing_visits,open_queries,safety_issues,forms_verified,clean_status,dqi_score,risk_level\n\
         P1,0,0,0,true,Not Clean,10.0,High\n",
    );

    let batch = read_csv_table(&path).unwrap();
    let scored = score_record_batch(&batch, &ScoringConfig::default()).unwrap();
    assert_eq!(scored.num_columns(), batch.num_columns());

    let output = dir.path().join("scored.csv");
    trial_dqi::io::write_csv(&scored, &output).unwrap();
    let reloaded = load_patients_csv(&output).unwrap();
    assert_eq!(reloaded[0].clean_status, Some(CleanStatus::Clean));
    // Verified but unsigned forms: 100 - 0.15 * 20
    assert_eq!(reloaded[0].dqi_score, Some(97.0));
}

#[test]
fn test_unreadable_counters_score_the_fallback() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        PATIENTS_FILE,
        "patient_id,total_visits_expected,visits_completed,missing_visits,total_queries,open_queries,queries_resolved,non_conformant_data,safety_issues,forms_verified,forms_signed\n\
         P001,12,12,0,0,0,0,0,0,true,true\n\
         P002,12,12,0,0,0,0,abc,0,true,true\n\
         P003,12,twelve,0,0,0,0,0,0,true,true\n",
    );

    let patients = load_patients_csv(&path).unwrap();
    assert!(!patients[0].has_malformed_fields());
    assert_eq!(patients[1].malformed_fields, vec!["non_conformant_data"]);
    assert_eq!(patients[2].malformed_fields, vec!["visits_completed"]);

    let scored = score_record_batch(&read_csv_table(&path).unwrap(), &ScoringConfig::default())
        .unwrap();
    let dqi = scored
        .column_by_name("dqi_score")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(dqi.values().to_vec(), vec![100.0, 50.0, 50.0]);

    let risk = scored
        .column_by_name("risk_level")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(risk.value(1), "High");
}

#[test]
fn test_stale_derived_labels_do_not_block_loading() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        PATIENTS_FILE,
        "patient_id,missing_visits,open_queries,safety_issues,forms_verified,clean_status,risk_level\n\
         P1,0,0,0,true,Partially Clean,Severe\n",
    );

    let loaded = load_dataset_dir(dir.path()).unwrap();
    assert_eq!(loaded.patients[0].clean_status, None);
    assert_eq!(loaded.patients[0].risk_level, None);
    let scored = score_patients(&loaded.patients, &ScoringConfig::default());
    assert_eq!(scored[0].clean_status, Some(CleanStatus::Clean));
}

#[test]
fn test_parquet_export() {
    let dir = tempdir().unwrap();
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    let sites = aggregate_sites(&patients, &fixture_roster(), &config);

    let patients_path = dir.path().join("scored_patients.parquet");
    write_parquet(&patients_to_record_batch(&patients).unwrap(), &patients_path).unwrap();
    let sites_path = dir.path().join("site_summaries.parquet");
    write_parquet(&site_summaries_to_record_batch(&sites).unwrap(), &sites_path).unwrap();

    let rows = |path: &Path| -> usize {
        ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
            .unwrap()
            .build()
            .unwrap()
            .map(|batch| batch.unwrap().num_rows())
            .sum()
    };
    assert_eq!(rows(&patients_path), 6);
    assert_eq!(rows(&sites_path), 5);
}

#[test]
fn test_summary_json_round_trip() {
    let dir = tempdir().unwrap();
    let config = ScoringConfig::default();
    let summary = calculate_summary(&fixture_patients(), &config);

    let path = dir.path().join("summary.json");
    write_summary_json(&summary, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"clean_rate_status\": \"Critical\""));
    let parsed: BatchSummary = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, summary);
}
