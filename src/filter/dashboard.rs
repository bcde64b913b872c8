//! Request-scoped dashboard filter selection

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::filter::criteria::{CleanFilter, FilterCriteria, PatientFilter};
use crate::models::{PatientRecord, RiskLevel};

/// Filter selection for one dashboard request
///
/// Empty lists and `None` values select everything. The selection is built
/// per request and passed into [`DashboardFilters::apply`]; nothing is
/// stored between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardFilters {
    /// Selected site ids
    pub sites: Vec<String>,
    /// Selected subject statuses
    pub subject_statuses: Vec<String>,
    /// Show only clean patients
    pub clean_only: bool,
    /// Show only patients with issues
    pub issues_only: bool,
    /// Selected risk levels
    pub risk_levels: Vec<RiskLevel>,
    /// Inclusive DQI range
    pub dqi_range: Option<(f64, f64)>,
    /// Earliest enrollment date
    pub enrolled_from: Option<NaiveDate>,
    /// Latest enrollment date
    pub enrolled_to: Option<NaiveDate>,
    /// Disease area
    pub disease: Option<String>,
    /// Free-text search
    pub search: Option<String>,
}

impl DashboardFilters {
    /// Clean-status view implied by the two toggles
    ///
    /// Selecting both toggles cancels them out.
    #[must_use]
    pub const fn clean_view(&self) -> CleanFilter {
        match (self.clean_only, self.issues_only) {
            (true, false) => CleanFilter::CleanOnly,
            (false, true) => CleanFilter::IssuesOnly,
            _ => CleanFilter::All,
        }
    }

    /// Combined filter for the selection
    #[must_use]
    pub fn to_filter(&self, config: &ScoringConfig) -> PatientFilter {
        let mut criteria = Vec::new();

        if !self.sites.is_empty() {
            criteria.push(PatientFilter::sites(self.sites.iter().cloned()));
        }
        if !self.subject_statuses.is_empty() {
            criteria.push(PatientFilter::subject_statuses(
                self.subject_statuses.iter().cloned(),
            ));
        }
        let view = self.clean_view();
        if view != CleanFilter::All {
            criteria.push(PatientFilter::Clean(view));
        }
        if !self.risk_levels.is_empty() {
            criteria.push(PatientFilter::RiskLevels {
                levels: self.risk_levels.clone(),
                config: config.clone(),
            });
        }
        if let Some((min, max)) = self.dqi_range {
            criteria.push(PatientFilter::DqiRange {
                min,
                max,
                config: config.clone(),
            });
        }
        if self.enrolled_from.is_some() || self.enrolled_to.is_some() {
            criteria.push(PatientFilter::EnrolledBetween {
                from: self.enrolled_from,
                to: self.enrolled_to,
            });
        }
        if let Some(disease) = &self.disease {
            criteria.push(PatientFilter::Disease(disease.clone()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            criteria.push(PatientFilter::search(search));
        }

        PatientFilter::All(criteria)
    }

    /// Apply the selection, returning the matching patients in input order
    #[must_use]
    pub fn apply(&self, patients: &[PatientRecord], config: &ScoringConfig) -> Vec<PatientRecord> {
        let filter = self.to_filter(config);
        let selected: Vec<PatientRecord> = patients
            .iter()
            .filter(|p| filter.meets_criteria(p))
            .cloned()
            .collect();
        debug!(
            "Dashboard filters selected {} of {} patients",
            selected.len(),
            patients.len()
        );
        selected
    }
}
