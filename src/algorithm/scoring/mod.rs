//! Per-patient scoring
//!
//! Clean-status classification, DQI calculation and risk bucketing, over
//! single records, record slices and Arrow batches.

pub mod batch;
pub mod clean_status;
pub mod columnar;
pub mod dqi;
pub mod risk;

pub use batch::{
    ScoredColumns, effective_clean_status, effective_dqi, effective_risk_level, score_columns,
    score_patient, score_patients, score_patients_in_place,
};
pub use clean_status::{CleanConditions, classify_clean_status};
pub use columnar::{score_record_batch, score_record_batches};
pub use dqi::{DqiComponents, ScoringError, calculate_dqi, round_one_decimal, try_calculate_dqi};
pub use risk::{clean_rate_status, dqi_status, risk_level};
