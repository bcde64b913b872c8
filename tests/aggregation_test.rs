//! Tests for site roll-ups, summaries, metrics and insights

mod utils;

use trial_dqi::algorithm::aggregation::{
    EnrollmentPoint, InsightKind, RiskMatrix, UNKNOWN_SITE, calculate_operational_metrics,
    enrollment_trend, sites_needing_attention,
};
use trial_dqi::{
    BatchSummary, CleanStatus, PerformanceStatus, PriorityLevel, QueryPriority, QueryRecord,
    QueryStatus, RiskLevel, ScoringConfig, TrialInfo, aggregate_sites, calculate_query_stats,
    calculate_summary, generate_insights, score_patients,
};
use utils::{date, fixture_patients, fixture_roster};

#[test]
fn test_site_order_and_values() {
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    let sites = aggregate_sites(&patients, &fixture_roster(), &config);

    let ids: Vec<&str> = sites.iter().map(|s| s.site_id.as_str()).collect();
    assert_eq!(ids, vec!["Site_B", "Site_A", "Site_C", "Site_Z", UNKNOWN_SITE]);

    let site_b = &sites[0];
    assert_eq!(site_b.region.as_deref(), Some("West"));
    assert_eq!(site_b.total_patients_enrolled, 2);
    assert_eq!(site_b.clean_percentage, 0.0);
    assert_eq!(site_b.avg_dqi, 83.5);
    assert_eq!(site_b.total_open_queries, 1);
    assert_eq!(site_b.performance_status, PerformanceStatus::Good);

    let site_a = &sites[1];
    assert_eq!(site_a.clean_patients, 1);
    assert_eq!(site_a.clean_percentage, 50.0);
    assert_eq!(site_a.avg_dqi, 78.0);
    assert_eq!(site_a.total_safety_issues, 1);
    assert_eq!(site_a.priority_level, PriorityLevel::Low);

    let site_c = &sites[2];
    assert_eq!(site_c.total_patients_enrolled, 0);
    assert_eq!(site_c.avg_dqi, 0.0);
    assert_eq!(site_c.performance_status, PerformanceStatus::Unknown);
    assert_eq!(site_c.priority_level, PriorityLevel::Low);
    assert!(!site_c.needs_attention);

    assert_eq!(sites[4].avg_dqi, 92.5);
}

#[test]
fn test_site_totals_match_patients() {
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    let sites = aggregate_sites(&patients, &fixture_roster(), &config);

    let enrolled: u64 = sites.iter().map(|s| s.total_patients_enrolled).sum();
    assert_eq!(enrolled, patients.len() as u64);
    let open: i64 = sites.iter().map(|s| s.total_open_queries).sum();
    assert_eq!(open, 4);

    assert!(sites_needing_attention(&sites).is_empty());
}

#[test]
fn test_sites_outside_filtered_view_are_not_flagged() {
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    // Only the Not Clean, High risk patient of Site_A
    let view: Vec<_> = patients
        .into_iter()
        .filter(|p| p.patient_id == "P002")
        .collect();

    let sites = aggregate_sites(&view, &fixture_roster(), &config);
    let site_b = &sites[0];
    assert_eq!(site_b.total_patients_enrolled, 0);
    assert_eq!(site_b.performance_status, PerformanceStatus::Unknown);

    let attention: Vec<&str> = sites_needing_attention(&sites)
        .into_iter()
        .map(|s| s.site_id.as_str())
        .collect();
    assert_eq!(attention, vec!["Site_A"]);

    let summary = calculate_summary(&view, &config);
    let insights = generate_insights(&sites, &summary, &config);
    let critical_sites = insights
        .iter()
        .find(|i| i.title == "Critical Sites Detected")
        .unwrap();
    assert!(critical_sites.message.starts_with("1 sites"));
    assert!(critical_sites.message.contains("Site_A"));
    assert!(!critical_sites.message.contains("Site_B"));
    assert!(!critical_sites.message.contains("Site_C"));
}

#[test]
fn test_duplicate_roster_entries_are_merged() {
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    let mut roster = fixture_roster();
    roster.push(roster[0].clone());

    let sites = aggregate_sites(&patients, &roster, &config);
    assert_eq!(sites.len(), 5);
}

#[test]
fn test_batch_summary() {
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    let summary = calculate_summary(&patients, &config);

    assert_eq!(summary.total_patients, 6);
    assert_eq!(summary.clean_patients, 1);
    assert_eq!(summary.clean_percentage, 16.7);
    assert_eq!(summary.avg_dqi, 84.7);
    assert_eq!(summary.total_open_queries, 4);
    assert_eq!(summary.total_safety_issues, 1);
    assert_eq!(summary.patients_over_missing_visits, 0);
    assert_eq!(summary.dqi_status, Some(PerformanceStatus::Good));
    assert_eq!(summary.clean_rate_status, Some(PerformanceStatus::Critical));

    // Unscored input gives the same summary
    assert_eq!(calculate_summary(&fixture_patients(), &config), summary);
}

#[test]
fn test_empty_summary_has_neutral_defaults() {
    let summary = calculate_summary(&[], &ScoringConfig::default());
    assert_eq!(summary, BatchSummary::empty());
    assert!(summary.dqi_status.is_none());
    assert!(!summary.avg_dqi.is_nan());
}

#[test]
fn test_operational_metrics() {
    let patients = fixture_patients();
    let metrics = calculate_operational_metrics(&patients, &TrialInfo::default());

    assert_eq!(metrics.active_patients, 4);
    assert_eq!(metrics.avg_visits_completed, 8.5);
    assert_eq!(metrics.query_resolution_rate, 66.7);
    assert_eq!(metrics.forms_verified_rate, 100.0);
    assert_eq!(metrics.total_protocol_deviations, 0);
    assert_eq!(metrics.enrollment_progress, 2.4);
}

#[test]
fn test_risk_matrix() {
    let config = ScoringConfig::default();
    let matrix = RiskMatrix::from_patients(&fixture_patients(), &config);

    assert_eq!(matrix.total(), 6);
    assert_eq!(matrix.get(RiskLevel::Low, CleanStatus::Clean), 1);
    assert_eq!(matrix.get(RiskLevel::Low, CleanStatus::NotClean), 3);
    assert_eq!(matrix.get(RiskLevel::Medium, CleanStatus::NotClean), 1);
    assert_eq!(matrix.get(RiskLevel::High, CleanStatus::NotClean), 1);
    assert_eq!(matrix.get(RiskLevel::High, CleanStatus::Clean), 0);
    assert_eq!(matrix.rows()[0], (RiskLevel::Low, [1, 3]));
}

#[test]
fn test_enrollment_trend_by_month() {
    let trend = enrollment_trend(&fixture_patients());
    assert_eq!(
        trend,
        vec![
            EnrollmentPoint {
                month: date(2024, 3, 1),
                count: 4
            },
            EnrollmentPoint {
                month: date(2024, 4, 1),
                count: 1
            },
        ]
    );
}

fn query(id: &str, site: &str, status: QueryStatus, priority: QueryPriority) -> QueryRecord {
    QueryRecord {
        query_id: id.to_string(),
        patient_id: "P001".to_string(),
        site_id: Some(site.to_string()),
        disease: None,
        query_type: Some("Missing Value".to_string()),
        query_priority: Some(priority),
        query_status: status,
        created_date: Some(date(2024, 5, 1)),
        resolved_date: None,
        query_age_days: Some(10),
        assigned_to: None,
    }
}

#[test]
fn test_query_stats() {
    let queries = vec![
        query("Q1", "Site_A", QueryStatus::Open, QueryPriority::High),
        query("Q2", "Site_A", QueryStatus::Open, QueryPriority::Low),
        query("Q3", "Site_B", QueryStatus::Resolved, QueryPriority::Low),
    ];

    let stored = calculate_query_stats(&queries, None);
    assert_eq!((stored.total, stored.open, stored.resolved), (3, 2, 1));
    assert_eq!(stored.avg_open_age_days, 10.0);
    assert_eq!(stored.open_by_priority.get(&QueryPriority::High), Some(&1));
    assert_eq!(stored.open_by_site.get("Site_A"), Some(&2));
    assert_eq!(stored.open_by_site.get("Site_B"), None);

    let recomputed = calculate_query_stats(&queries, Some(date(2024, 5, 31)));
    assert_eq!(recomputed.oldest_open_age_days, Some(30));
}

#[test]
fn test_insights() {
    let config = ScoringConfig::default();
    let patients = score_patients(&fixture_patients(), &config);
    let sites = aggregate_sites(&patients, &fixture_roster(), &config);
    let summary = calculate_summary(&patients, &config);

    let insights = generate_insights(&sites, &summary, &config);
    let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![InsightKind::Critical, InsightKind::Warning]);
    assert_eq!(insights[0].title, "Open Safety Issues");
    assert!(insights.iter().all(|i| !i.message.contains("Site_C")));
    assert!(insights.iter().all(|i| !i.recommendation.is_empty()));
}

#[test]
fn test_missed_visit_limit() {
    let mut config = ScoringConfig::default();
    config.thresholds.max_missing_visits = 1;
    let patients = score_patients(&fixture_patients(), &config);
    let summary = calculate_summary(&patients, &config);
    // P002 and P003 have missed two visits each
    assert_eq!(summary.patients_over_missing_visits, 2);

    let sites = aggregate_sites(&patients, &fixture_roster(), &config);
    let insights = generate_insights(&sites, &summary, &config);
    let missed = insights.iter().find(|i| i.title == "Missed Visits").unwrap();
    assert_eq!(missed.kind, InsightKind::Warning);
    assert!(missed.message.starts_with("2 patients"));
}

#[test]
fn test_no_insights_for_empty_table() {
    let config = ScoringConfig::default();
    let insights = generate_insights(&[], &BatchSummary::empty(), &config);
    assert!(insights.is_empty());
}
