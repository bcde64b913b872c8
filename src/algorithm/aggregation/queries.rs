//! Query statistics for display

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithm::scoring::round_one_decimal;
use crate::models::{QueryPriority, QueryRecord};

/// Open/resolved counts and ages for a query table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStats {
    /// Number of queries
    pub total: u64,
    /// Open queries
    pub open: u64,
    /// Resolved queries
    pub resolved: u64,
    /// Mean age of open queries in days, one decimal
    pub avg_open_age_days: f64,
    /// Age of the oldest open query in days
    pub oldest_open_age_days: Option<i64>,
    /// Open queries per priority
    pub open_by_priority: BTreeMap<QueryPriority, u64>,
    /// Open queries per site
    pub open_by_site: BTreeMap<String, u64>,
}

/// Compute query statistics
///
/// With `as_of` set, ages are recomputed from the creation dates; otherwise
/// the stored `query_age_days` is used.
#[must_use]
pub fn calculate_query_stats(queries: &[QueryRecord], as_of: Option<NaiveDate>) -> QueryStats {
    let mut stats = QueryStats {
        total: queries.len() as u64,
        ..Default::default()
    };

    let mut open_ages = Vec::new();
    for query in queries {
        if !query.is_open() {
            stats.resolved += 1;
            continue;
        }

        stats.open += 1;
        if let Some(priority) = query.query_priority {
            *stats.open_by_priority.entry(priority).or_insert(0) += 1;
        }
        if let Some(site_id) = &query.site_id {
            *stats.open_by_site.entry(site_id.clone()).or_insert(0) += 1;
        }

        let age = match as_of {
            Some(date) => query.age_at(date),
            None => query.query_age_days,
        };
        if let Some(age) = age {
            open_ages.push(age);
        }
    }

    if !open_ages.is_empty() {
        let mean = open_ages.iter().sum::<i64>() as f64 / open_ages.len() as f64;
        stats.avg_open_age_days = round_one_decimal(mean);
        stats.oldest_open_age_days = open_ages.iter().max().copied();
    }

    stats
}

/// Open query count for one priority
#[must_use]
pub fn open_count(stats: &QueryStats, priority: QueryPriority) -> u64 {
    stats.open_by_priority.get(&priority).copied().unwrap_or(0)
}
