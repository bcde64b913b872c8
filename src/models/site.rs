//! Site roster and site summary models

use serde::{Deserialize, Serialize};

use crate::models::types::{PerformanceStatus, PriorityLevel};

/// A clinical site from the trial roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Site identifier
    pub site_id: String,
    /// Human readable site name
    pub site_name: Option<String>,
    /// Geographic region
    pub region: Option<String>,
}

impl SiteRecord {
    /// Create a roster entry with only the identifier set
    #[must_use]
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            site_name: None,
            region: None,
        }
    }

    /// Set the region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }
}

/// Aggregated data-quality view of one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSummary {
    /// Site identifier
    pub site_id: String,
    /// Human readable site name
    pub site_name: Option<String>,
    /// Geographic region
    pub region: Option<String>,
    /// Patients enrolled at the site
    pub total_patients_enrolled: u64,
    /// Patients classified Clean
    pub clean_patients: u64,
    /// Clean patients as a percentage of enrolled, one decimal
    pub clean_percentage: f64,
    /// Mean patient DQI, one decimal
    pub avg_dqi: f64,
    /// Sum of open queries
    pub total_open_queries: i64,
    /// Sum of safety issues
    pub total_safety_issues: i64,
    /// Sum of adverse events
    pub total_adverse_events: i64,
    /// Performance classification of `avg_dqi`
    pub performance_status: PerformanceStatus,
    /// Monitoring priority
    pub priority_level: PriorityLevel,
    /// Whether the site is Critical or Warning
    pub needs_attention: bool,
}
