#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use trial_dqi::{PatientRecord, SiteRecord};

/// Date helper for fixtures
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Patient with every base field set
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn patient(
    id: &str,
    site: &str,
    visits: (i64, i64),
    queries: (i64, i64, i64),
    non_conformant: i64,
    safety_issues: i64,
    forms: (bool, bool),
    missing_visits: i64,
) -> PatientRecord {
    let (total_queries, open_queries, queries_resolved) = queries;
    PatientRecord {
        subject_status: Some("Active".to_string()),
        disease: Some("Oncology".to_string()),
        enrollment_date: Some(date(2024, 3, 10)),
        total_visits_expected: Some(visits.1),
        visits_completed: Some(visits.0),
        missing_visits: Some(missing_visits),
        total_queries: Some(total_queries),
        open_queries: Some(open_queries),
        queries_resolved: Some(queries_resolved),
        non_conformant_data: Some(non_conformant),
        safety_issues: Some(safety_issues),
        adverse_events: Some(0),
        protocol_deviations: Some(0),
        forms_verified: Some(forms.0),
        forms_signed: Some(forms.1),
        ..PatientRecord::new(id, site)
    }
}

/// Six patients with known scores
///
/// | id   | site    | clean | DQI  | risk   |
/// |------|---------|-------|------|--------|
/// | P001 | Site_A  | yes   | 100  | Low    |
/// | P002 | Site_A  | no    | 56   | High   |
/// | P003 | Site_B  | no    | 95   | Low    |
/// | P004 | Site_B  | no    | 72   | Medium |
/// | P005 | Site_Z  | no    | 92.5 | Low    |
/// | P006 | (none)  | no    | 92.5 | Low    |
#[must_use]
pub fn fixture_patients() -> Vec<PatientRecord> {
    let mut p005 = PatientRecord::new("P005", "Site_Z");
    p005.enrollment_date = Some(date(2024, 4, 2));
    let p006 = PatientRecord {
        patient_id: "P006".to_string(),
        ..Default::default()
    };

    vec![
        patient("P001", "Site_A", (12, 12), (0, 0, 0), 0, 0, (true, true), 0),
        patient("P002", "Site_A", (6, 12), (5, 3, 2), 1, 1, (true, false), 2),
        patient("P003", "Site_B", (10, 12), (2, 0, 2), 0, 0, (true, true), 2),
        patient("P004", "Site_B", (6, 10), (5, 1, 4), 2, 0, (true, false), 0),
        p005,
        p006,
    ]
}

/// Roster listing Site_B before Site_A and an empty Site_C
#[must_use]
pub fn fixture_roster() -> Vec<SiteRecord> {
    vec![
        SiteRecord::new("Site_B").with_region("West"),
        SiteRecord::new("Site_A").with_region("North"),
        SiteRecord::new("Site_C").with_region("South"),
    ]
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
