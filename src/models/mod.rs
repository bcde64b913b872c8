//! Domain models for trial monitoring
//!
//! Patients, sites and queries as they are loaded from flat tables, plus
//! the categorical labels produced by scoring and aggregation.

pub mod patient;
pub mod query;
pub mod site;
pub mod types;

// Re-export commonly used types
pub use patient::PatientRecord;
pub use query::QueryRecord;
pub use site::{SiteRecord, SiteSummary};
pub use types::{
    CleanStatus, PerformanceStatus, PriorityLevel, QueryPriority, QueryStatus, RiskLevel,
};
