//! Deterministic synthetic trial data
//!
//! Generates a patient table, the site roster and a query log for demos and
//! tests. Output carries only base fields; derived fields come from scoring.
//! The same configuration always yields the same dataset.

pub mod config;

use chrono::{Days, NaiveDate};
use log::{debug, info};
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;

use crate::error::{Result, TrialError};
use crate::models::{PatientRecord, QueryPriority, QueryRecord, QueryStatus, SiteRecord};
use crate::utils::logging::{finish_progress_bar, optional_progress_bar};

pub use config::{DiseaseWeight, GeneratorConfig};

/// Visits expected per patient by the data snapshot
pub const EXPECTED_VISITS: i64 = 12;

const QUERY_TYPES: [&str; 4] = [
    "Data Entry Error",
    "Missing Value",
    "Protocol Deviation",
    "Safety Concern",
];

const ASSIGNEES: [&str; 5] = [
    "CRA_John_Smith",
    "CRA_Sarah_Johnson",
    "CRA_Michael_Chen",
    "CRA_Priya_Sharma",
    "CRA_Robert_Davis",
];

const SUBJECT_STATUSES: [&str; 2] = ["Active", "Completed"];

/// A generated dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedDataset {
    /// Patient table with base fields only
    pub patients: Vec<PatientRecord>,
    /// Site roster
    pub sites: Vec<SiteRecord>,
    /// Query log
    pub queries: Vec<QueryRecord>,
}

/// Builder state for one generation run
struct DatasetBuilder<'a> {
    config: &'a GeneratorConfig,
    rng: StdRng,
    diseases: WeightedIndex<u32>,
}

impl<'a> DatasetBuilder<'a> {
    fn new(config: &'a GeneratorConfig) -> Result<Self> {
        let diseases = WeightedIndex::new(config.diseases.iter().map(|d| d.weight))
            .map_err(|e| TrialError::config(format!("invalid disease weights: {e}")))?;

        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            diseases,
        })
    }

    fn days_before(&self, days: u64) -> NaiveDate {
        self.config
            .as_of
            .checked_sub_days(Days::new(days))
            .unwrap_or(self.config.as_of)
    }

    fn days_after(&self, date: NaiveDate, days: u64) -> NaiveDate {
        date.checked_add_days(Days::new(days))
            .unwrap_or(date)
            .min(self.config.as_of)
    }

    fn pick<'s>(&mut self, values: &'s [&'s str]) -> &'s str {
        values.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn patient(&mut self, index: usize) -> PatientRecord {
        let site_id = self
            .config
            .sites
            .choose(&mut self.rng)
            .map(|s| s.site_id.clone())
            .unwrap_or_default();
        let disease = self.config.diseases[self.diseases.sample(&mut self.rng)]
            .name
            .clone();
        let enrolled_days_ago = self.rng.random_range(50..=200);
        let enrollment_date = self.days_before(enrolled_days_ago);
        let is_clean = self.rng.random_bool(self.config.clean_ratio);

        let mut patient = PatientRecord {
            patient_id: format!("P{index:03}"),
            site_id: Some(site_id),
            subject_status: Some(self.pick(&SUBJECT_STATUSES).to_string()),
            disease: Some(disease),
            enrollment_date: Some(enrollment_date),
            total_visits_expected: Some(EXPECTED_VISITS),
            adverse_events: Some(self.rng.random_range(0..=1)),
            ..Default::default()
        };

        if is_clean {
            patient.visits_completed = Some(EXPECTED_VISITS);
            patient.missing_visits = Some(0);
            patient.total_queries = Some(self.rng.random_range(0..=3));
            patient.open_queries = Some(0);
            patient.non_conformant_data = Some(0);
            patient.safety_issues = Some(0);
            patient.protocol_deviations = Some(0);
            patient.forms_verified = Some(true);
            patient.forms_signed = Some(true);
        } else {
            let open = self.rng.random_range(1..=5);
            patient.visits_completed = Some(self.rng.random_range(6..=11));
            patient.missing_visits = Some(self.rng.random_range(1..=4));
            // Raised queries never fall below the open ones
            patient.total_queries = Some(self.rng.random_range(3..=12_i64).max(open));
            patient.open_queries = Some(open);
            patient.non_conformant_data = Some(self.rng.random_range(1..=4));
            patient.safety_issues = Some(self.rng.random_range(0..=2));
            patient.protocol_deviations = Some(self.rng.random_range(0..=1));
            patient.forms_verified = Some(false);
            patient.forms_signed = Some(false);
        }
        patient.queries_resolved = patient
            .total_queries
            .zip(patient.open_queries)
            .map(|(total, open)| total - open);

        patient
    }

    fn query(
        &mut self,
        number: usize,
        patient: &PatientRecord,
        status: QueryStatus,
    ) -> QueryRecord {
        let enrolled = patient.enrollment_date.unwrap_or(self.config.as_of);
        let (created_after, priorities): (u64, &[QueryPriority]) = match status {
            QueryStatus::Open => (self.rng.random_range(0..=100), &QueryPriority::ALL),
            QueryStatus::Resolved => (
                self.rng.random_range(0..=150),
                &[QueryPriority::Low, QueryPriority::Medium],
            ),
        };
        let created = self.days_after(enrolled, created_after);
        let resolved_date = match status {
            QueryStatus::Open => None,
            QueryStatus::Resolved => {
                let days = self.rng.random_range(1..=14);
                Some(self.days_after(created, days))
            }
        };

        QueryRecord {
            query_id: format!("Q{number:05}"),
            patient_id: patient.patient_id.clone(),
            site_id: patient.site_id.clone(),
            disease: patient.disease.clone(),
            query_type: Some(self.pick(&QUERY_TYPES).to_string()),
            query_priority: priorities.choose(&mut self.rng).copied(),
            query_status: status,
            created_date: Some(created),
            resolved_date,
            query_age_days: Some((self.config.as_of - created).num_days()),
            assigned_to: Some(self.pick(&ASSIGNEES).to_string()),
        }
    }

    fn build(mut self) -> GeneratedDataset {
        let config = self.config;
        let pb = optional_progress_bar(
            config.show_progress,
            config.num_patients as u64,
            Some("Generating patients"),
        );

        let mut patients = Vec::with_capacity(config.num_patients);
        for index in 1..=config.num_patients {
            patients.push(self.patient(index));
            pb.inc(1);
        }
        finish_progress_bar(&pb, Some("Patients generated"));

        let mut queries = Vec::new();
        for patient in &patients {
            for _ in 0..patient.open_queries.unwrap_or(0) {
                let query = self.query(queries.len() + 1, patient, QueryStatus::Open);
                queries.push(query);
            }
        }
        let open = queries.len();

        if !patients.is_empty() {
            for _ in 0..config.resolved_queries {
                let index = self.rng.random_range(0..patients.len());
                let query = self.query(queries.len() + 1, &patients[index], QueryStatus::Resolved);
                queries.push(query);
            }
        }
        debug!(
            "Generated {} open and {} resolved queries",
            open,
            queries.len() - open
        );

        GeneratedDataset {
            patients,
            sites: config.sites.clone(),
            queries,
        }
    }
}

/// Generate a dataset from the configuration
pub fn generate(config: &GeneratorConfig) -> Result<GeneratedDataset> {
    config.validate()?;
    info!(
        "Generating {} patients across {} sites (seed {})",
        config.num_patients,
        config.sites.len(),
        config.seed
    );

    let dataset = DatasetBuilder::new(config)?.build();

    info!(
        "Generated {} patients, {} sites, {} queries",
        dataset.patients.len(),
        dataset.sites.len(),
        dataset.queries.len()
    );
    Ok(dataset)
}
