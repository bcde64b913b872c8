//! Aggregation of scored patients
//!
//! Site roll-ups, batch summaries, dashboard metrics, query statistics and
//! the insights built on top of them.

pub mod insights;
pub mod metrics;
pub mod queries;
pub mod site;
pub mod summary;

pub use insights::{Insight, InsightKind, generate_insights};
pub use metrics::{
    EnrollmentPoint, OperationalMetrics, RiskMatrix, calculate_operational_metrics,
    enrollment_trend,
};
pub use queries::{QueryStats, calculate_query_stats};
pub use site::{
    UNKNOWN_SITE, aggregate_sites, aggregate_sites_from_patients, sites_needing_attention,
    summarize_site,
};
pub use summary::{BatchSummary, calculate_summary};
