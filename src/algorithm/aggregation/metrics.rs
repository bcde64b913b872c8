//! Dashboard metrics beyond the batch summary
//!
//! Operational quick statistics, the risk × clean-status matrix and the
//! monthly enrollment trend.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::algorithm::aggregation::site::percentage;
use crate::algorithm::scoring::{effective_clean_status, effective_risk_level, round_one_decimal};
use crate::config::{ScoringConfig, TrialInfo};
use crate::models::{CleanStatus, PatientRecord, RiskLevel};

/// Operational quick statistics for a patient table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalMetrics {
    /// Patients with subject status Active
    pub active_patients: u64,
    /// Mean visits completed over patients reporting the counter
    pub avg_visits_completed: f64,
    /// Σ resolved / Σ raised queries as a percentage, 0 with no queries
    pub query_resolution_rate: f64,
    /// Share of patients with verified forms as a percentage
    pub forms_verified_rate: f64,
    /// Sum of protocol deviations
    pub total_protocol_deviations: i64,
    /// Enrolled patients against the trial target as a percentage
    pub enrollment_progress: f64,
}

/// Compute operational metrics for a patient table
#[must_use]
pub fn calculate_operational_metrics(
    patients: &[PatientRecord],
    trial: &TrialInfo,
) -> OperationalMetrics {
    let active_patients = patients.iter().filter(|p| p.is_active()).count() as u64;

    let visits: Vec<i64> = patients.iter().filter_map(|p| p.visits_completed).collect();
    let avg_visits_completed = if visits.is_empty() {
        0.0
    } else {
        visits.iter().sum::<i64>() as f64 / visits.len() as f64
    };

    let total_queries: i64 = patients.iter().filter_map(|p| p.total_queries).sum();
    let resolved_queries: i64 = patients.iter().filter_map(|p| p.queries_resolved).sum();
    let query_resolution_rate = if total_queries > 0 {
        resolved_queries as f64 / total_queries as f64 * 100.0
    } else {
        0.0
    };

    let reported: Vec<bool> = patients.iter().filter_map(|p| p.forms_verified).collect();
    let verified = reported.iter().filter(|&&v| v).count();
    let forms_verified_rate = percentage(verified, reported.len());

    OperationalMetrics {
        active_patients,
        avg_visits_completed: round_one_decimal(avg_visits_completed),
        query_resolution_rate: round_one_decimal(query_resolution_rate),
        forms_verified_rate: round_one_decimal(forms_verified_rate),
        total_protocol_deviations: patients.iter().filter_map(|p| p.protocol_deviations).sum(),
        enrollment_progress: round_one_decimal(percentage(patients.len(), trial.target_patients)),
    }
}

/// Patient counts per risk level and clean status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskMatrix {
    counts: BTreeMap<(RiskLevel, CleanStatus), u64>,
}

impl RiskMatrix {
    /// Build the matrix from a patient table
    #[must_use]
    pub fn from_patients(patients: &[PatientRecord], config: &ScoringConfig) -> Self {
        let mut counts = BTreeMap::new();
        for patient in patients {
            let key = (
                effective_risk_level(patient, config),
                effective_clean_status(patient),
            );
            *counts.entry(key).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count for one cell
    #[must_use]
    pub fn get(&self, risk: RiskLevel, clean: CleanStatus) -> u64 {
        self.counts.get(&(risk, clean)).copied().unwrap_or(0)
    }

    /// Total patients in the matrix
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Rows in ascending risk order, each with Clean and Not Clean counts
    #[must_use]
    pub fn rows(&self) -> Vec<(RiskLevel, [u64; 2])> {
        RiskLevel::ALL
            .iter()
            .map(|&risk| {
                (
                    risk,
                    [
                        self.get(risk, CleanStatus::Clean),
                        self.get(risk, CleanStatus::NotClean),
                    ],
                )
            })
            .collect()
    }
}

/// Patients enrolled in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentPoint {
    /// First day of the month
    pub month: NaiveDate,
    /// Patients enrolled during the month
    pub count: u64,
}

/// Monthly enrollment counts in chronological order
///
/// Patients without an enrollment date are not counted.
#[must_use]
pub fn enrollment_trend(patients: &[PatientRecord]) -> Vec<EnrollmentPoint> {
    let mut by_month: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for date in patients.iter().filter_map(|p| p.enrollment_date) {
        if let Some(month) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) {
            *by_month.entry(month).or_insert(0) += 1;
        }
    }

    by_month
        .into_iter()
        .map(|(month, count)| EnrollmentPoint { month, count })
        .collect()
}
