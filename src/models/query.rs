//! Data-clarification query model
//!
//! Queries are tracked for display only; scoring reads the per-patient
//! query counters instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::types::{QueryPriority, QueryStatus};

/// A data-clarification request raised against a patient record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Query identifier
    pub query_id: String,
    /// Patient the query is raised against
    pub patient_id: String,
    /// Site of the patient
    pub site_id: Option<String>,
    /// Disease area
    pub disease: Option<String>,
    /// Query category (Data Entry Error, Missing Value, ...)
    pub query_type: Option<String>,
    /// Priority
    pub query_priority: Option<QueryPriority>,
    /// Open or resolved
    pub query_status: QueryStatus,
    /// Date the query was raised
    pub created_date: Option<NaiveDate>,
    /// Date the query was resolved
    pub resolved_date: Option<NaiveDate>,
    /// Age in days at the time of the data snapshot
    pub query_age_days: Option<i64>,
    /// Person the query is assigned to
    pub assigned_to: Option<String>,
}

impl QueryRecord {
    /// Whether the query is still open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.query_status == QueryStatus::Open
    }

    /// Age of the query as of `as_of`, falling back to the stored age
    #[must_use]
    pub fn age_at(&self, as_of: NaiveDate) -> Option<i64> {
        self.created_date
            .map(|created| (as_of - created).num_days())
            .or(self.query_age_days)
    }
}
