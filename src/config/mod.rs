//! Scoring configuration.
//!
//! A single [`ScoringConfig`] carries every weight and breakpoint used by the
//! classifier, the DQI calculator, the risk bucketer and the aggregators, so
//! all of them classify against the same threshold set. It is passed
//! explicitly into each call.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrialError};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the five DQI components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqiWeights {
    /// Share of completed vs. expected visits
    pub visit_completion: f64,
    /// Share of resolved vs. raised queries
    pub query_resolution: f64,
    /// Penalty for non-conformant data points
    pub data_quality: f64,
    /// Form verification and signature state
    pub timeliness: f64,
    /// Presence of safety issues
    pub safety: f64,
}

impl Default for DqiWeights {
    fn default() -> Self {
        Self {
            visit_completion: 0.30,
            query_resolution: 0.25,
            data_quality: 0.20,
            timeliness: 0.15,
            safety: 0.10,
        }
    }
}

impl DqiWeights {
    /// Sum of all component weights
    #[must_use]
    pub fn total(&self) -> f64 {
        self.visit_completion
            + self.query_resolution
            + self.data_quality
            + self.timeliness
            + self.safety
    }

    fn as_named(&self) -> [(&'static str, f64); 5] {
        [
            ("visit_completion", self.visit_completion),
            ("query_resolution", self.query_resolution),
            ("data_quality", self.data_quality),
            ("timeliness", self.timeliness),
            ("safety", self.safety),
        ]
    }
}

/// Breakpoints shared by risk bucketing, site performance and summary labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// DQI below this is Critical / High risk
    pub dqi_critical: f64,
    /// DQI below this (and at or above `dqi_critical`) is Warning / Medium risk
    pub dqi_warning: f64,
    /// Clean percentage below this is Critical
    pub clean_critical: f64,
    /// Clean percentage at or above this is Good
    pub clean_target: f64,
    /// Open queries per site before the site is flagged in insights
    pub max_open_queries: u64,
    /// Missing visits per patient tolerated before the patient counts
    /// towards the missed-visits insight
    pub max_missing_visits: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            dqi_critical: 60.0,
            dqi_warning: 75.0,
            clean_critical: 50.0,
            clean_target: 70.0,
            max_open_queries: 10,
            max_missing_visits: 3,
        }
    }
}

/// Fixed sub-score values used by the DQI components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentScores {
    /// Non-conformant data points that drive the data quality score to zero
    pub max_non_conformant: f64,
    /// Timeliness when forms are verified and signed
    pub timeliness_verified_signed: f64,
    /// Timeliness when forms are verified only
    pub timeliness_verified: f64,
    /// Timeliness otherwise
    pub timeliness_unverified: f64,
    /// Safety score with no safety issues
    pub safety_clean: f64,
    /// Safety score with one or more safety issues
    pub safety_with_issues: f64,
    /// Score assigned when a record cannot be scored
    pub fallback_dqi: f64,
}

impl Default for ComponentScores {
    fn default() -> Self {
        Self {
            max_non_conformant: 5.0,
            timeliness_verified_signed: 100.0,
            timeliness_verified: 80.0,
            timeliness_unverified: 50.0,
            safety_clean: 100.0,
            safety_with_issues: 30.0,
            fallback_dqi: 50.0,
        }
    }
}

/// Complete scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// DQI component weights
    pub weights: DqiWeights,
    /// Classification breakpoints
    pub thresholds: Thresholds,
    /// DQI component constants
    pub components: ComponentScores,
}

impl ScoringConfig {
    /// Load a configuration from a JSON file and validate it
    ///
    /// Fields absent from the file keep their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string and validate it
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that weights and thresholds are mutually consistent
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.weights.as_named() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(TrialError::config(format!(
                    "weight '{name}' must be within [0, 1], got {weight}"
                )));
            }
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(TrialError::config(format!(
                "DQI weights must sum to 1.0, got {total:.4}"
            )));
        }

        let t = &self.thresholds;
        if t.dqi_critical >= t.dqi_warning {
            return Err(TrialError::config(format!(
                "dqi_critical ({}) must be below dqi_warning ({})",
                t.dqi_critical, t.dqi_warning
            )));
        }
        if t.clean_critical >= t.clean_target {
            return Err(TrialError::config(format!(
                "clean_critical ({}) must be below clean_target ({})",
                t.clean_critical, t.clean_target
            )));
        }

        let c = &self.components;
        if c.max_non_conformant <= 0.0 {
            return Err(TrialError::config("max_non_conformant must be positive"));
        }
        if !(0.0..=100.0).contains(&c.fallback_dqi) {
            return Err(TrialError::config("fallback_dqi must be within [0, 100]"));
        }

        Ok(())
    }
}

impl fmt::Display for ScoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scoring Configuration:")?;
        writeln!(f, "  Weights:")?;
        for (name, weight) in self.weights.as_named() {
            writeln!(f, "    {name}: {weight:.2}")?;
        }
        writeln!(
            f,
            "  DQI Breakpoints: critical < {}, warning < {}",
            self.thresholds.dqi_critical, self.thresholds.dqi_warning
        )?;
        writeln!(
            f,
            "  Clean % Breakpoints: critical < {}, target >= {}",
            self.thresholds.clean_critical, self.thresholds.clean_target
        )?;
        writeln!(f, "  Fallback DQI: {}", self.components.fallback_dqi)
    }
}

/// Descriptive information about the trial being monitored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialInfo {
    /// Trial display name
    pub name: String,
    /// Trial phase
    pub phase: String,
    /// Therapeutic area
    pub therapeutic_area: String,
    /// Enrollment target
    pub target_patients: usize,
}

impl Default for TrialInfo {
    fn default() -> Self {
        Self {
            name: "Clinical Intelligence Platform".to_string(),
            phase: "Phase 3".to_string(),
            therapeutic_area: "Oncology".to_string(),
            target_patients: 250,
        }
    }
}

impl fmt::Display for TrialInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) target {} patients",
            self.name, self.phase, self.therapeutic_area, self.target_patients
        )
    }
}
