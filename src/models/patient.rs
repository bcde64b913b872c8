//! Patient entity model
//!
//! A `PatientRecord` holds the base counters collected for one trial subject
//! together with the derived scoring fields. Derived fields are never
//! trusted as input: scoring recomputes them from the base counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::types::{CleanStatus, RiskLevel};

/// Subject status label for patients currently on study
pub const ACTIVE_STATUS: &str = "Active";

/// One trial subject with its data-quality counters
///
/// Every base field except `patient_id` is optional so that tables with
/// missing columns still load. Scoring decides how an absent value is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Patient identifier
    pub patient_id: String,
    /// Site the patient is enrolled at
    pub site_id: Option<String>,
    /// Subject status (Active, Completed, Screening, Withdrawn, ...)
    pub subject_status: Option<String>,
    /// Disease area of the study arm
    pub disease: Option<String>,
    /// Enrollment date
    pub enrollment_date: Option<NaiveDate>,

    // Visit counters
    /// Visits expected per protocol so far
    pub total_visits_expected: Option<i64>,
    /// Visits completed
    pub visits_completed: Option<i64>,
    /// Visits missed
    pub missing_visits: Option<i64>,

    // Query counters
    /// Queries raised against the record
    pub total_queries: Option<i64>,
    /// Queries still open
    pub open_queries: Option<i64>,
    /// Queries resolved
    pub queries_resolved: Option<i64>,

    // Data quality and safety counters
    /// Data points failing conformance checks
    pub non_conformant_data: Option<i64>,
    /// Open safety issues
    pub safety_issues: Option<i64>,
    /// Reported adverse events
    pub adverse_events: Option<i64>,
    /// Protocol deviations
    pub protocol_deviations: Option<i64>,

    // Form state
    /// Source data verified
    pub forms_verified: Option<bool>,
    /// Forms signed by the investigator
    pub forms_signed: Option<bool>,

    // Derived fields
    /// Clean classification
    pub clean_status: Option<CleanStatus>,
    /// Data Quality Index in [0, 100]
    pub dqi_score: Option<f64>,
    /// Risk bucket derived from the DQI
    pub risk_level: Option<RiskLevel>,

    /// Counters present in the source table but not readable as whole
    /// numbers; such counters are also `None` above
    #[serde(skip)]
    pub malformed_fields: Vec<String>,
}

impl PatientRecord {
    /// Create a record with only identity fields set
    #[must_use]
    pub fn new(patient_id: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            site_id: Some(site_id.into()),
            ..Default::default()
        }
    }

    /// Whether the derived fields have been computed
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        self.clean_status.is_some() && self.dqi_score.is_some() && self.risk_level.is_some()
    }

    /// Whether any source counter could not be read
    #[must_use]
    pub fn has_malformed_fields(&self) -> bool {
        !self.malformed_fields.is_empty()
    }

    /// Whether the subject is currently active on study
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subject_status.as_deref() == Some(ACTIVE_STATUS)
    }

    /// Copy of this record with the derived fields cleared
    #[must_use]
    pub fn without_derived(&self) -> Self {
        Self {
            clean_status: None,
            dqi_score: None,
            risk_level: None,
            ..self.clone()
        }
    }

    /// Textual values used by free-text search
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.patient_id.as_str()),
            self.site_id.as_deref(),
            self.subject_status.as_deref(),
            self.disease.as_deref(),
            self.clean_status.map(CleanStatus::as_str),
            self.risk_level.map(RiskLevel::as_str),
        ]
        .into_iter()
        .flatten()
    }
}
