//! Tests for synthetic dataset generation

use chrono::Days;
use rustc_hash::FxHashSet;
use trial_dqi::generator::{EXPECTED_VISITS, GeneratorConfig, generate};
use trial_dqi::{
    CleanStatus, RiskLevel, ScoringConfig, aggregate_sites, calculate_summary, score_patients,
};

#[test]
fn test_default_dataset_shape() {
    let config = GeneratorConfig::default();
    let dataset = generate(&config).unwrap();

    assert_eq!(dataset.patients.len(), 250);
    assert_eq!(dataset.sites, config.sites);
    assert_eq!(dataset.patients[0].patient_id, "P001");
    assert_eq!(dataset.patients[249].patient_id, "P250");

    let roster: FxHashSet<&str> = dataset.sites.iter().map(|s| s.site_id.as_str()).collect();
    assert!(
        dataset
            .patients
            .iter()
            .all(|p| p.site_id.as_deref().is_some_and(|s| roster.contains(s)))
    );

    let diseases: FxHashSet<&str> = config.diseases.iter().map(|d| d.name.as_str()).collect();
    assert!(
        dataset
            .patients
            .iter()
            .all(|p| p.disease.as_deref().is_some_and(|d| diseases.contains(d)))
    );
}

#[test]
fn test_counters_are_consistent() {
    let config = GeneratorConfig::default();
    let dataset = generate(&config).unwrap();

    let earliest = config.as_of - Days::new(200);
    let latest = config.as_of - Days::new(50);

    for p in &dataset.patients {
        assert_eq!(p.total_visits_expected, Some(EXPECTED_VISITS));
        let enrolled = p.enrollment_date.unwrap();
        assert!(enrolled >= earliest && enrolled <= latest);

        let total = p.total_queries.unwrap();
        let open = p.open_queries.unwrap();
        assert!(open <= total);
        assert_eq!(p.queries_resolved, Some(total - open));
        assert!(p.visits_completed.unwrap() <= EXPECTED_VISITS);
    }
}

#[test]
fn test_query_dates_are_ordered() {
    let config = GeneratorConfig::default();
    let dataset = generate(&config).unwrap();

    let enrollment: std::collections::HashMap<&str, _> = dataset
        .patients
        .iter()
        .map(|p| (p.patient_id.as_str(), p.enrollment_date.unwrap()))
        .collect();

    for q in &dataset.queries {
        let created = q.created_date.unwrap();
        assert!(created >= enrollment[q.patient_id.as_str()]);
        assert!(created <= config.as_of);
        assert_eq!(q.query_age_days, Some((config.as_of - created).num_days()));
        match q.resolved_date {
            Some(resolved) => {
                assert!(!q.is_open());
                assert!(resolved >= created && resolved <= config.as_of);
            }
            None => assert!(q.is_open()),
        }
    }
}

#[test]
fn test_clean_patients_score_perfectly() {
    let scoring = ScoringConfig::default();
    let dataset = generate(&GeneratorConfig::default()).unwrap();
    let scored = score_patients(&dataset.patients, &scoring);
    assert!(
        scored
            .iter()
            .all(|p| p.dqi_score.is_some_and(|dqi| (0.0..=100.0).contains(&dqi)))
    );

    let clean: Vec<_> = scored
        .iter()
        .filter(|p| p.clean_status == Some(CleanStatus::Clean))
        .collect();
    assert!(!clean.is_empty());
    assert!(clean.iter().all(|p| p.dqi_score == Some(100.0)));
    assert!(clean.iter().all(|p| p.risk_level == Some(RiskLevel::Low)));
}

#[test]
fn test_generated_data_aggregates_over_whole_roster() {
    let scoring = ScoringConfig::default();
    let dataset = generate(&GeneratorConfig::default()).unwrap();
    let scored = score_patients(&dataset.patients, &scoring);

    let sites = aggregate_sites(&scored, &dataset.sites, &scoring);
    assert_eq!(sites.len(), dataset.sites.len());
    let enrolled: u64 = sites.iter().map(|s| s.total_patients_enrolled).sum();
    assert_eq!(enrolled, 250);

    let summary = calculate_summary(&scored, &scoring);
    assert_eq!(summary.total_patients, 250);
    assert!(summary.clean_percentage > 0.0 && summary.clean_percentage < 100.0);
}

#[test]
fn test_seed_changes_dataset() {
    let a = generate(&GeneratorConfig::default()).unwrap();
    let b = generate(&GeneratorConfig {
        seed: 7,
        ..Default::default()
    })
    .unwrap();
    assert_ne!(a.patients, b.patients);
}

#[test]
fn test_invalid_configs_are_rejected() {
    let no_sites = GeneratorConfig {
        sites: Vec::new(),
        ..Default::default()
    };
    assert!(generate(&no_sites).is_err());

    let mut zero_weights = GeneratorConfig::default();
    for disease in &mut zero_weights.diseases {
        disease.weight = 0;
    }
    assert!(generate(&zero_weights).is_err());
}

#[test]
fn test_empty_dataset() {
    let dataset = generate(&GeneratorConfig {
        num_patients: 0,
        ..Default::default()
    })
    .unwrap();
    assert!(dataset.patients.is_empty());
    assert!(dataset.queries.is_empty());
}
