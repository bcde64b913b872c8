//! Batch summary statistics for a (possibly filtered) patient table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::aggregation::site::percentage;
use crate::algorithm::scoring::{
    clean_rate_status, dqi_status, effective_clean_status, effective_dqi, round_one_decimal,
};
use crate::config::ScoringConfig;
use crate::models::{PatientRecord, PerformanceStatus};

/// Headline numbers for a patient table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of patients
    pub total_patients: u64,
    /// Number of Clean patients
    pub clean_patients: u64,
    /// Clean patients as a percentage, one decimal
    pub clean_percentage: f64,
    /// Mean DQI, one decimal
    pub avg_dqi: f64,
    /// Sum of open queries
    pub total_open_queries: i64,
    /// Sum of safety issues
    pub total_safety_issues: i64,
    /// Patients with more missing visits than `Thresholds::max_missing_visits`
    pub patients_over_missing_visits: u64,
    /// Band of `avg_dqi`; `None` for an empty table
    pub dqi_status: Option<PerformanceStatus>,
    /// Band of `clean_percentage`; `None` for an empty table
    pub clean_rate_status: Option<PerformanceStatus>,
}

impl BatchSummary {
    /// Summary of an empty table
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total_patients: 0,
            clean_patients: 0,
            clean_percentage: 0.0,
            avg_dqi: 0.0,
            total_open_queries: 0,
            total_safety_issues: 0,
            patients_over_missing_visits: 0,
            dqi_status: None,
            clean_rate_status: None,
        }
    }

    /// Whether the summary describes an empty table
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_patients == 0
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::empty()
    }
}

fn status_label(status: Option<PerformanceStatus>) -> &'static str {
    status.map_or("N/A", PerformanceStatus::as_str)
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient Summary:")?;
        writeln!(f, "  Total Patients: {}", self.total_patients)?;
        writeln!(
            f,
            "  Clean Patients: {} ({:.1}%) [{}]",
            self.clean_patients,
            self.clean_percentage,
            status_label(self.clean_rate_status)
        )?;
        writeln!(
            f,
            "  Average DQI: {:.1} [{}]",
            self.avg_dqi,
            status_label(self.dqi_status)
        )?;
        writeln!(f, "  Open Queries: {}", self.total_open_queries)?;
        writeln!(f, "  Safety Issues: {}", self.total_safety_issues)?;
        writeln!(
            f,
            "  Patients Over Missed-Visit Limit: {}",
            self.patients_over_missing_visits
        )
    }
}

/// Compute the summary of a patient table
///
/// An empty table yields [`BatchSummary::empty`].
#[must_use]
pub fn calculate_summary(patients: &[PatientRecord], config: &ScoringConfig) -> BatchSummary {
    if patients.is_empty() {
        return BatchSummary::empty();
    }

    let total = patients.len();
    let clean = patients
        .iter()
        .filter(|p| effective_clean_status(p).is_clean())
        .count();

    let clean_percentage = round_one_decimal(percentage(clean, total));
    let avg_dqi = round_one_decimal(
        patients.iter().map(|p| effective_dqi(p, config)).sum::<f64>() / total as f64,
    );

    BatchSummary {
        total_patients: total as u64,
        clean_patients: clean as u64,
        clean_percentage,
        avg_dqi,
        total_open_queries: patients.iter().filter_map(|p| p.open_queries).sum(),
        total_safety_issues: patients.iter().filter_map(|p| p.safety_issues).sum(),
        patients_over_missing_visits: patients
            .iter()
            .filter(|p| {
                p.missing_visits
                    .is_some_and(|m| m > config.thresholds.max_missing_visits as i64)
            })
            .count() as u64,
        dqi_status: Some(dqi_status(avg_dqi, &config.thresholds)),
        clean_rate_status: Some(clean_rate_status(clean_percentage, &config.thresholds)),
    }
}
