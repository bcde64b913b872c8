//! Clean-status classification
//!
//! A patient is Clean only when every condition holds at once. There is no
//! partial credit, and an absent value counts as a failed condition.

use crate::models::{CleanStatus, PatientRecord};

/// Individual clean conditions for one patient, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanConditions {
    /// `missing_visits == 0`
    pub no_missing_visits: bool,
    /// `open_queries == 0`
    pub no_open_queries: bool,
    /// `safety_issues == 0`
    pub no_safety_issues: bool,
    /// `forms_verified == true`
    pub forms_verified: bool,
}

impl CleanConditions {
    /// Evaluate the conditions for a patient
    #[must_use]
    pub fn evaluate(patient: &PatientRecord) -> Self {
        Self {
            no_missing_visits: patient.missing_visits == Some(0),
            no_open_queries: patient.open_queries == Some(0),
            no_safety_issues: patient.safety_issues == Some(0),
            forms_verified: patient.forms_verified == Some(true),
        }
    }

    /// Whether every condition holds
    #[must_use]
    pub const fn all_met(&self) -> bool {
        self.no_missing_visits && self.no_open_queries && self.no_safety_issues && self.forms_verified
    }

    /// Names of the conditions that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&'static str> {
        [
            (self.no_missing_visits, "missing_visits"),
            (self.no_open_queries, "open_queries"),
            (self.no_safety_issues, "safety_issues"),
            (self.forms_verified, "forms_verified"),
        ]
        .into_iter()
        .filter_map(|(met, name)| (!met).then_some(name))
        .collect()
    }
}

/// Classify a patient as Clean or Not Clean
#[must_use]
pub fn classify_clean_status(patient: &PatientRecord) -> CleanStatus {
    if CleanConditions::evaluate(patient).all_met() {
        CleanStatus::Clean
    } else {
        CleanStatus::NotClean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_patient() -> PatientRecord {
        PatientRecord {
            missing_visits: Some(0),
            open_queries: Some(0),
            safety_issues: Some(0),
            forms_verified: Some(true),
            ..PatientRecord::new("P001", "Site_A")
        }
    }

    #[test]
    fn test_all_conditions_met_is_clean() {
        assert_eq!(classify_clean_status(&clean_patient()), CleanStatus::Clean);
    }

    #[test]
    fn test_single_failure_is_not_clean() {
        let cases = [
            PatientRecord { missing_visits: Some(2), ..clean_patient() },
            PatientRecord { open_queries: Some(1), ..clean_patient() },
            PatientRecord { safety_issues: Some(1), ..clean_patient() },
            PatientRecord { forms_verified: Some(false), ..clean_patient() },
        ];
        for patient in &cases {
            assert_eq!(classify_clean_status(patient), CleanStatus::NotClean);
        }
    }

    #[test]
    fn test_missing_fields_are_not_clean() {
        let cases = [
            PatientRecord { missing_visits: None, ..clean_patient() },
            PatientRecord { open_queries: None, ..clean_patient() },
            PatientRecord { safety_issues: None, ..clean_patient() },
            PatientRecord { forms_verified: None, ..clean_patient() },
        ];
        for patient in &cases {
            assert_eq!(classify_clean_status(patient), CleanStatus::NotClean);
        }
    }

    #[test]
    fn test_failures_are_reported_by_name() {
        let patient = PatientRecord {
            open_queries: Some(3),
            forms_verified: None,
            ..clean_patient()
        };
        let conditions = CleanConditions::evaluate(&patient);
        assert_eq!(conditions.failures(), vec!["open_queries", "forms_verified"]);
    }
}
