//! Risk bucketing and status banding
//!
//! All three classifications read their breakpoints from the same
//! [`Thresholds`], so a patient's risk level and its site's performance
//! status always agree on where 60 and 75 fall.

use crate::config::Thresholds;
use crate::models::{PerformanceStatus, RiskLevel};

/// Bucket a DQI score into a risk level
///
/// `< dqi_critical` is High, `< dqi_warning` is Medium, otherwise Low.
/// A NaN score is treated as High.
#[must_use]
pub fn risk_level(dqi_score: f64, thresholds: &Thresholds) -> RiskLevel {
    if dqi_score.is_nan() || dqi_score < thresholds.dqi_critical {
        RiskLevel::High
    } else if dqi_score < thresholds.dqi_warning {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Classify an average DQI as a performance status
#[must_use]
pub fn dqi_status(avg_dqi: f64, thresholds: &Thresholds) -> PerformanceStatus {
    band(avg_dqi, thresholds.dqi_critical, thresholds.dqi_warning)
}

/// Classify a clean percentage as a performance status
#[must_use]
pub fn clean_rate_status(clean_percentage: f64, thresholds: &Thresholds) -> PerformanceStatus {
    band(clean_percentage, thresholds.clean_critical, thresholds.clean_target)
}

fn band(value: f64, critical: f64, target: f64) -> PerformanceStatus {
    if value.is_nan() || value < critical {
        PerformanceStatus::Critical
    } else if value < target {
        PerformanceStatus::Warning
    } else {
        PerformanceStatus::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_breakpoints() {
        let t = Thresholds::default();
        assert_eq!(risk_level(0.0, &t), RiskLevel::High);
        assert_eq!(risk_level(59.9, &t), RiskLevel::High);
        assert_eq!(risk_level(60.0, &t), RiskLevel::Medium);
        assert_eq!(risk_level(74.9, &t), RiskLevel::Medium);
        assert_eq!(risk_level(75.0, &t), RiskLevel::Low);
        assert_eq!(risk_level(100.0, &t), RiskLevel::Low);
    }

    #[test]
    fn test_risk_is_monotonic() {
        let t = Thresholds::default();
        let mut previous = risk_level(0.0, &t);
        for tenth in 1..=1000 {
            let current = risk_level(f64::from(tenth) / 10.0, &t);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_status_bands() {
        let t = Thresholds::default();
        assert_eq!(dqi_status(59.0, &t), PerformanceStatus::Critical);
        assert_eq!(dqi_status(60.0, &t), PerformanceStatus::Warning);
        assert_eq!(dqi_status(75.0, &t), PerformanceStatus::Good);
        assert_eq!(clean_rate_status(49.9, &t), PerformanceStatus::Critical);
        assert_eq!(clean_rate_status(50.0, &t), PerformanceStatus::Warning);
        assert_eq!(clean_rate_status(70.0, &t), PerformanceStatus::Good);
    }
}
