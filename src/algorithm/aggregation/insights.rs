//! Monitoring insights derived from site summaries and the batch summary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::aggregation::site::sites_needing_attention;
use crate::algorithm::aggregation::summary::BatchSummary;
use crate::config::ScoringConfig;
use crate::models::{PerformanceStatus, SiteSummary};

/// Severity of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InsightKind {
    /// Needs immediate action
    Critical,
    /// Should be followed up
    Warning,
    /// Informational
    Info,
}

/// A finding with a recommended action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Severity
    pub kind: InsightKind,
    /// Short title
    pub title: String,
    /// What was found
    pub message: String,
    /// What to do about it
    pub recommendation: String,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {}: {} -> {}",
            self.kind, self.title, self.message, self.recommendation
        )
    }
}

/// Generate insights, most severe first
#[must_use]
pub fn generate_insights(
    sites: &[SiteSummary],
    summary: &BatchSummary,
    config: &ScoringConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let attention = sites_needing_attention(sites);

    let critical: Vec<&str> = attention
        .iter()
        .filter(|s| s.performance_status == PerformanceStatus::Critical)
        .map(|s| s.site_id.as_str())
        .collect();
    if !critical.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Critical,
            title: "Critical Sites Detected".to_string(),
            message: format!(
                "{} sites need immediate attention: {}",
                critical.len(),
                critical.join(", ")
            ),
            recommendation: "Schedule priority monitoring visits.".to_string(),
        });
    }

    let warning: Vec<&str> = attention
        .iter()
        .filter(|s| s.performance_status == PerformanceStatus::Warning)
        .map(|s| s.site_id.as_str())
        .collect();
    if !warning.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Sites Below DQI Target".to_string(),
            message: format!(
                "{} sites have an average DQI below {}: {}",
                warning.len(),
                config.thresholds.dqi_warning,
                warning.join(", ")
            ),
            recommendation: "Review query backlog and visit compliance with site staff."
                .to_string(),
        });
    }

    let query_heavy: Vec<&str> = sites
        .iter()
        .filter(|s| s.total_open_queries > config.thresholds.max_open_queries as i64)
        .map(|s| s.site_id.as_str())
        .collect();
    if !query_heavy.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Query Backlog".to_string(),
            message: format!(
                "{} sites have more than {} open queries: {}",
                query_heavy.len(),
                config.thresholds.max_open_queries,
                query_heavy.join(", ")
            ),
            recommendation: "Prioritise query resolution before the next data cut.".to_string(),
        });
    }

    if summary.total_safety_issues > 0 {
        insights.push(Insight {
            kind: InsightKind::Critical,
            title: "Open Safety Issues".to_string(),
            message: format!(
                "{} safety issues are open across {} patients",
                summary.total_safety_issues, summary.total_patients
            ),
            recommendation: "Escalate to the medical monitor for review.".to_string(),
        });
    }

    if summary.patients_over_missing_visits > 0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Missed Visits".to_string(),
            message: format!(
                "{} patients have missed more than {} visits",
                summary.patients_over_missing_visits, config.thresholds.max_missing_visits
            ),
            recommendation: "Contact sites to reschedule overdue visits.".to_string(),
        });
    }

    if !summary.is_empty() && summary.clean_percentage < config.thresholds.clean_target {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Clean Rate Below Target".to_string(),
            message: format!(
                "{:.1}% of patients are clean, target is {}%",
                summary.clean_percentage, config.thresholds.clean_target
            ),
            recommendation: "Focus source data verification on Not Clean patients.".to_string(),
        });
    }

    if insights.is_empty() && !summary.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "All Sites On Track".to_string(),
            message: "No site or patient metric is outside its target band.".to_string(),
            recommendation: "Continue routine monitoring.".to_string(),
        });
    }

    insights.sort_by_key(|i| i.kind);
    insights
}
