//! Batch scoring over patient tables
//!
//! Scoring is done column by column: the clean-status, DQI and risk columns
//! are each produced in a single pass over the table, then written back to
//! the records. Per-row results are identical to scoring one patient at a
//! time, and any derived values already present on the input are ignored.

use crate::algorithm::scoring::clean_status::classify_clean_status;
use crate::algorithm::scoring::dqi::calculate_dqi;
use crate::algorithm::scoring::risk::risk_level;
use crate::config::ScoringConfig;
use crate::models::{CleanStatus, PatientRecord, RiskLevel};

/// Derived columns for a patient table, index-aligned with the input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredColumns {
    /// Clean classification per patient
    pub clean_status: Vec<CleanStatus>,
    /// DQI per patient
    pub dqi_score: Vec<f64>,
    /// Risk level per patient
    pub risk_level: Vec<RiskLevel>,
}

impl ScoredColumns {
    /// Number of scored rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.dqi_score.len()
    }

    /// Whether no rows were scored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dqi_score.is_empty()
    }
}

/// Compute the derived columns for a patient table
#[must_use]
pub fn score_columns(patients: &[PatientRecord], config: &ScoringConfig) -> ScoredColumns {
    let clean_status = patients.iter().map(classify_clean_status).collect();
    let dqi_score: Vec<f64> = patients.iter().map(|p| calculate_dqi(p, config)).collect();
    let risk_level = dqi_score
        .iter()
        .map(|&score| risk_level(score, &config.thresholds))
        .collect();

    ScoredColumns {
        clean_status,
        dqi_score,
        risk_level,
    }
}

/// Overwrite the derived fields of every patient in place
pub fn score_patients_in_place(patients: &mut [PatientRecord], config: &ScoringConfig) {
    let scored = score_columns(patients, config);
    for (i, patient) in patients.iter_mut().enumerate() {
        patient.clean_status = Some(scored.clean_status[i]);
        patient.dqi_score = Some(scored.dqi_score[i]);
        patient.risk_level = Some(scored.risk_level[i]);
    }
}

/// Score a patient table, returning a new table with derived fields set
#[must_use]
pub fn score_patients(patients: &[PatientRecord], config: &ScoringConfig) -> Vec<PatientRecord> {
    let mut scored = patients.to_vec();
    score_patients_in_place(&mut scored, config);
    log::debug!("Scored {} patients", scored.len());
    scored
}

/// Score a single patient
#[must_use]
pub fn score_patient(patient: &PatientRecord, config: &ScoringConfig) -> PatientRecord {
    let dqi_score = calculate_dqi(patient, config);
    PatientRecord {
        clean_status: Some(classify_clean_status(patient)),
        dqi_score: Some(dqi_score),
        risk_level: Some(risk_level(dqi_score, &config.thresholds)),
        ..patient.clone()
    }
}

/// DQI of a patient, computing it when the record has not been scored
#[must_use]
pub fn effective_dqi(patient: &PatientRecord, config: &ScoringConfig) -> f64 {
    patient
        .dqi_score
        .unwrap_or_else(|| calculate_dqi(patient, config))
}

/// Clean status of a patient, computing it when the record has not been scored
#[must_use]
pub fn effective_clean_status(patient: &PatientRecord) -> CleanStatus {
    patient
        .clean_status
        .unwrap_or_else(|| classify_clean_status(patient))
}

/// Risk level of a patient, computing it when the record has not been scored
#[must_use]
pub fn effective_risk_level(patient: &PatientRecord, config: &ScoringConfig) -> RiskLevel {
    patient
        .risk_level
        .unwrap_or_else(|| risk_level(effective_dqi(patient, config), &config.thresholds))
}
