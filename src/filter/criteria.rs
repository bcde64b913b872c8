//! Patient filtering criteria
//!
//! Filters narrow a patient table down to the rows a monitoring view asks
//! for. Criteria compose through `All` and `Any`.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::algorithm::scoring::{effective_clean_status, effective_dqi, effective_risk_level};
use crate::config::ScoringConfig;
use crate::models::{PatientRecord, RiskLevel};

/// Defines a criterion for filtering entities
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}

/// Clean-status view selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanFilter {
    /// Every patient
    #[default]
    All,
    /// Only Clean patients
    CleanOnly,
    /// Only Not Clean patients
    IssuesOnly,
}

/// A filter that can be applied to a patient
///
/// Criteria that read derived fields use the stored value when the record
/// is scored and compute it otherwise, so they work on raw tables too.
#[derive(Debug, Clone)]
pub enum PatientFilter {
    /// Site id is in the set
    Sites(FxHashSet<String>),
    /// Subject status is in the set
    SubjectStatuses(FxHashSet<String>),
    /// Clean-status view
    Clean(CleanFilter),
    /// Risk level is in the set
    RiskLevels {
        /// Accepted levels
        levels: Vec<RiskLevel>,
        /// Scoring configuration for unscored records
        config: ScoringConfig,
    },
    /// DQI within an inclusive range
    DqiRange {
        /// Minimum DQI (inclusive)
        min: f64,
        /// Maximum DQI (inclusive)
        max: f64,
        /// Scoring configuration for unscored records
        config: ScoringConfig,
    },
    /// Enrollment date within an inclusive range
    EnrolledBetween {
        /// Earliest date (inclusive)
        from: Option<NaiveDate>,
        /// Latest date (inclusive)
        to: Option<NaiveDate>,
    },
    /// Disease area equals the value
    Disease(String),
    /// Case-insensitive substring over the textual fields
    Search(String),
    /// Combined filter that requires all criteria to be met
    All(Vec<PatientFilter>),
    /// Combined filter that requires any criterion to be met
    Any(Vec<PatientFilter>),
}

impl PatientFilter {
    /// Filter on a set of site ids
    pub fn sites<I, S>(sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sites(sites.into_iter().map(Into::into).collect())
    }

    /// Filter on a set of subject statuses
    pub fn subject_statuses<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::SubjectStatuses(statuses.into_iter().map(Into::into).collect())
    }

    /// Free-text search; the needle is lowercased once here
    pub fn search(needle: impl AsRef<str>) -> Self {
        Self::Search(needle.as_ref().trim().to_lowercase())
    }

    /// Apply the filter to a table, returning matching rows in input order
    #[must_use]
    pub fn apply<'a>(&self, patients: &'a [PatientRecord]) -> Vec<&'a PatientRecord> {
        patients.iter().filter(|p| self.meets_criteria(p)).collect()
    }

    /// Apply the filter to a table, returning owned copies
    #[must_use]
    pub fn apply_cloned(&self, patients: &[PatientRecord]) -> Vec<PatientRecord> {
        patients
            .iter()
            .filter(|p| self.meets_criteria(p))
            .cloned()
            .collect()
    }
}

fn matches_search(patient: &PatientRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    patient
        .searchable_text()
        .any(|text| text.to_lowercase().contains(needle))
}

impl FilterCriteria<PatientRecord> for PatientFilter {
    fn meets_criteria(&self, patient: &PatientRecord) -> bool {
        match self {
            Self::Sites(sites) => patient
                .site_id
                .as_ref()
                .is_some_and(|site| sites.contains(site)),
            Self::SubjectStatuses(statuses) => patient
                .subject_status
                .as_ref()
                .is_some_and(|status| statuses.contains(status)),
            Self::Clean(view) => match view {
                CleanFilter::All => true,
                CleanFilter::CleanOnly => effective_clean_status(patient).is_clean(),
                CleanFilter::IssuesOnly => !effective_clean_status(patient).is_clean(),
            },
            Self::RiskLevels { levels, config } => {
                levels.contains(&effective_risk_level(patient, config))
            }
            Self::DqiRange { min, max, config } => {
                let dqi = effective_dqi(patient, config);
                dqi >= *min && dqi <= *max
            }
            Self::EnrolledBetween { from, to } => match patient.enrollment_date {
                Some(date) => {
                    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
                }
                // No enrollment date to compare
                None => false,
            },
            Self::Disease(disease) => patient.disease.as_deref() == Some(disease.as_str()),
            Self::Search(needle) => matches_search(patient, needle),
            Self::All(filters) => filters.iter().all(|f| f.meets_criteria(patient)),
            Self::Any(filters) => filters.iter().any(|f| f.meets_criteria(patient)),
        }
    }
}
