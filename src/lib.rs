//! Data-quality scoring and site aggregation for clinical trial monitoring.
//!
//! Raw patient rows are classified clean or not clean, given a Data Quality
//! Index (DQI) and a risk level, then rolled up into site summaries, batch
//! summaries and monitoring insights. Every scoring and aggregation call is
//! a pure transformation over an in-memory table; file loading and export
//! live in [`io`].

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod generator;
pub mod io;
pub mod models;
pub mod utils;

// Core types
pub use config::{ComponentScores, DqiWeights, ScoringConfig, Thresholds, TrialInfo};
pub use error::{Result, TrialError};
pub use models::{
    CleanStatus, PatientRecord, PerformanceStatus, PriorityLevel, QueryPriority, QueryRecord,
    QueryStatus, RiskLevel, SiteRecord, SiteSummary,
};

// Scoring
pub use algorithm::scoring::{
    calculate_dqi, classify_clean_status, risk_level, score_patient, score_patients,
    score_record_batch,
};

// Aggregation
pub use algorithm::aggregation::{
    BatchSummary, Insight, InsightKind, QueryStats, aggregate_sites, calculate_query_stats,
    calculate_summary, generate_insights,
};

// Filtering
pub use filter::{DashboardFilters, FilterCriteria, PatientFilter, paginate};

// Arrow types
pub use arrow::record_batch::RecordBatch;
