//! Data Quality Index calculation
//!
//! The DQI combines five component sub-scores, each clamped to [0, 100],
//! through the configured weights:
//!
//! | Component        | Sub-score                                               |
//! |------------------|---------------------------------------------------------|
//! | visit completion | `100 * visits_completed / total_visits_expected`        |
//! | query resolution | `100 * queries_resolved / total_queries`                |
//! | data quality     | `100 - non_conformant_data / max_non_conformant * 100`  |
//! | timeliness       | verified and signed / verified only / otherwise         |
//! | safety           | no safety issues / one or more                          |
//!
//! Absent counters read as zero here (an absent expectation scores 100),
//! unlike clean-status classification, which reads them as failures.
//! A record that cannot be scored (see [`ScoringError`]) receives the
//! configured fallback score instead of an error.

use log::warn;

use crate::config::{ComponentScores, DqiWeights, ScoringConfig};
use crate::models::PatientRecord;

const MAX_SCORE: f64 = 100.0;

/// Reasons a record cannot be scored
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// A counter holds a negative value
    #[error("counter '{field}' is negative ({value})")]
    NegativeCounter {
        /// Counter name
        field: &'static str,
        /// Offending value
        value: i64,
    },

    /// A counter was present in the source but could not be read
    #[error("counter '{field}' is not a whole number")]
    Malformed {
        /// Counter name
        field: String,
    },

    /// An intermediate value is NaN or infinite
    #[error("component '{0}' is not a finite number")]
    NonFinite(&'static str),
}

/// The five component sub-scores of a patient's DQI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DqiComponents {
    /// Visit completion sub-score
    pub visit_completion: f64,
    /// Query resolution sub-score
    pub query_resolution: f64,
    /// Data quality sub-score
    pub data_quality: f64,
    /// Timeliness sub-score
    pub timeliness: f64,
    /// Safety sub-score
    pub safety: f64,
}

impl DqiComponents {
    /// Compute the component sub-scores for a patient
    pub fn compute(
        patient: &PatientRecord,
        scores: &ComponentScores,
    ) -> Result<Self, ScoringError> {
        if let Some(field) = patient.malformed_fields.first() {
            return Err(ScoringError::Malformed {
                field: field.clone(),
            });
        }
        let expected = counter("total_visits_expected", patient.total_visits_expected)?;
        let completed = counter("visits_completed", patient.visits_completed)?;
        let total_queries = counter("total_queries", patient.total_queries)?;
        let resolved = counter("queries_resolved", patient.queries_resolved)?;
        let non_conformant = counter("non_conformant_data", patient.non_conformant_data)?;
        let safety_issues = counter("safety_issues", patient.safety_issues)?;

        let visit_completion = if expected > 0 {
            ratio_score(completed, expected)
        } else {
            MAX_SCORE
        };

        let query_resolution = if total_queries > 0 {
            ratio_score(resolved, total_queries)
        } else {
            MAX_SCORE
        };

        let data_quality =
            MAX_SCORE - (non_conformant as f64 / scores.max_non_conformant * MAX_SCORE);

        let verified = patient.forms_verified.unwrap_or(false);
        let signed = patient.forms_signed.unwrap_or(false);
        let timeliness = match (verified, signed) {
            (true, true) => scores.timeliness_verified_signed,
            (true, false) => scores.timeliness_verified,
            _ => scores.timeliness_unverified,
        };

        let safety = if safety_issues == 0 {
            scores.safety_clean
        } else {
            scores.safety_with_issues
        };

        Ok(Self {
            visit_completion: clamp_score("visit_completion", visit_completion)?,
            query_resolution: clamp_score("query_resolution", query_resolution)?,
            data_quality: clamp_score("data_quality", data_quality)?,
            timeliness: clamp_score("timeliness", timeliness)?,
            safety: clamp_score("safety", safety)?,
        })
    }

    /// Weighted sum of the components, before clamping and rounding
    #[must_use]
    pub fn weighted_sum(&self, weights: &DqiWeights) -> f64 {
        self.visit_completion * weights.visit_completion
            + self.query_resolution * weights.query_resolution
            + self.data_quality * weights.data_quality
            + self.timeliness * weights.timeliness
            + self.safety * weights.safety
    }
}

/// Calculate the DQI, reporting why a record cannot be scored
pub fn try_calculate_dqi(
    patient: &PatientRecord,
    config: &ScoringConfig,
) -> Result<f64, ScoringError> {
    let components = DqiComponents::compute(patient, &config.components)?;
    let total = clamp_score("dqi", components.weighted_sum(&config.weights))?;
    Ok(round_one_decimal(total))
}

/// Calculate the DQI for a patient
///
/// Never fails: records that cannot be scored get
/// `config.components.fallback_dqi`.
#[must_use]
pub fn calculate_dqi(patient: &PatientRecord, config: &ScoringConfig) -> f64 {
    match try_calculate_dqi(patient, config) {
        Ok(score) => score,
        Err(e) => {
            warn!(
                "Falling back to DQI {} for patient {}: {e}",
                config.components.fallback_dqi, patient.patient_id
            );
            config.components.fallback_dqi
        }
    }
}

/// Round to one decimal place
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn counter(field: &'static str, value: Option<i64>) -> Result<i64, ScoringError> {
    match value {
        Some(v) if v < 0 => Err(ScoringError::NegativeCounter { field, value: v }),
        Some(v) => Ok(v),
        None => Ok(0),
    }
}

fn ratio_score(numerator: i64, denominator: i64) -> f64 {
    MAX_SCORE * (numerator as f64 / denominator as f64)
}

fn clamp_score(component: &'static str, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value.clamp(0.0, MAX_SCORE))
    } else {
        Err(ScoringError::NonFinite(component))
    }
}
