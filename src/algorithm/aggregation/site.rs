//! Site-level aggregation
//!
//! Rolls scored patients up into one [`SiteSummary`] per site. Sites come
//! from the roster first (in roster order), followed by any site that only
//! appears in the patient table, sorted by id. A roster site without
//! patients (for example one outside a filtered view) gets a zero-filled
//! summary with an `Unknown` status that never needs attention.

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;

use crate::algorithm::scoring::{
    dqi_status, effective_clean_status, effective_dqi, round_one_decimal,
};
use crate::config::ScoringConfig;
use crate::models::{PatientRecord, PerformanceStatus, SiteRecord, SiteSummary};

/// Site id used for patients without one
pub const UNKNOWN_SITE: &str = "Unknown";

/// Summarize the patients of a single site
///
/// `patients` is expected to hold only patients of `site`. An empty slice
/// yields zero counts and averages with [`PerformanceStatus::Unknown`].
#[must_use]
pub fn summarize_site(
    site: &SiteRecord,
    patients: &[&PatientRecord],
    config: &ScoringConfig,
) -> SiteSummary {
    let total = patients.len();
    let clean = patients
        .iter()
        .filter(|p| effective_clean_status(p).is_clean())
        .count();

    let clean_percentage = round_one_decimal(percentage(clean, total));
    let avg_dqi = if total > 0 {
        patients.iter().map(|p| effective_dqi(p, config)).sum::<f64>() / total as f64
    } else {
        0.0
    };
    // Classify the value that is displayed
    let avg_dqi = round_one_decimal(avg_dqi);
    let performance_status = if total > 0 {
        dqi_status(avg_dqi, &config.thresholds)
    } else {
        PerformanceStatus::Unknown
    };

    SiteSummary {
        site_id: site.site_id.clone(),
        site_name: site.site_name.clone(),
        region: site.region.clone(),
        total_patients_enrolled: total as u64,
        clean_patients: clean as u64,
        clean_percentage,
        avg_dqi,
        total_open_queries: sum_counter(patients, |p| p.open_queries),
        total_safety_issues: sum_counter(patients, |p| p.safety_issues),
        total_adverse_events: sum_counter(patients, |p| p.adverse_events),
        performance_status,
        priority_level: performance_status.priority(),
        needs_attention: performance_status.needs_attention(),
    }
}

/// Aggregate a scored patient table into per-site summaries
#[must_use]
pub fn aggregate_sites(
    patients: &[PatientRecord],
    roster: &[SiteRecord],
    config: &ScoringConfig,
) -> Vec<SiteSummary> {
    let mut by_site: FxHashMap<&str, Vec<&PatientRecord>> = FxHashMap::default();
    for patient in patients {
        let site_id = patient.site_id.as_deref().unwrap_or(UNKNOWN_SITE);
        by_site.entry(site_id).or_default().push(patient);
    }

    let mut summaries = Vec::with_capacity(roster.len().max(by_site.len()));
    for site in roster.iter().unique_by(|s| s.site_id.clone()) {
        let site_patients = by_site.remove(site.site_id.as_str()).unwrap_or_default();
        if site_patients.is_empty() {
            debug!("Site {} has no patients, using zero-filled summary", site.site_id);
        }
        summaries.push(summarize_site(site, &site_patients, config));
    }

    for (site_id, site_patients) in by_site.into_iter().sorted_by_key(|(id, _)| *id) {
        debug!("Site {site_id} is not on the roster, summarizing from patients only");
        summaries.push(summarize_site(&SiteRecord::new(site_id), &site_patients, config));
    }

    summaries
}

/// Aggregate a patient table when no roster is available
#[must_use]
pub fn aggregate_sites_from_patients(
    patients: &[PatientRecord],
    config: &ScoringConfig,
) -> Vec<SiteSummary> {
    aggregate_sites(patients, &[], config)
}

/// Summaries of sites that are Critical or Warning, worst average DQI first
#[must_use]
pub fn sites_needing_attention(summaries: &[SiteSummary]) -> Vec<&SiteSummary> {
    summaries
        .iter()
        .filter(|s| s.needs_attention)
        .sorted_by(|a, b| a.avg_dqi.total_cmp(&b.avg_dqi))
        .collect()
}

/// `part / total * 100`, or 0 when `total` is zero
#[must_use]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn sum_counter<F>(patients: &[&PatientRecord], field: F) -> i64
where
    F: Fn(&PatientRecord) -> Option<i64>,
{
    patients.iter().filter_map(|p| field(*p)).sum()
}
