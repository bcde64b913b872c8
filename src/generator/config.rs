//! Synthetic dataset configuration
//!
//! This module defines the options for generating a deterministic
//! demonstration dataset of patients, sites and queries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrialError};
use crate::models::SiteRecord;

/// A disease area with its relative sampling weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseWeight {
    /// Disease area name
    pub name: String,
    /// Relative weight
    pub weight: u32,
}

impl DiseaseWeight {
    /// Create a weighted disease entry
    #[must_use]
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Configuration for dataset generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the random number generator
    pub seed: u64,
    /// Number of patients to generate
    pub num_patients: usize,
    /// Probability that a patient is generated clean
    pub clean_ratio: f64,
    /// Number of resolved queries added after the open ones
    pub resolved_queries: usize,
    /// Snapshot date that enrollment dates and query ages count back from
    pub as_of: NaiveDate,
    /// Site roster
    pub sites: Vec<SiteRecord>,
    /// Disease areas with sampling weights
    pub diseases: Vec<DiseaseWeight>,
    /// Show a progress bar while generating
    pub show_progress: bool,
}

fn default_as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
}

fn default_sites() -> Vec<SiteRecord> {
    [
        ("Site_A_Delhi", "North"),
        ("Site_B_Mumbai", "West"),
        ("Site_C_Chennai", "South"),
        ("Site_D_Kolkata", "East"),
        ("Site_E_Bangalore", "South"),
    ]
    .into_iter()
    .map(|(id, region)| {
        SiteRecord::new(id)
            .with_name(id.replace('_', " "))
            .with_region(region)
    })
    .collect()
}

fn default_diseases() -> Vec<DiseaseWeight> {
    vec![
        DiseaseWeight::new("Oncology", 40),
        DiseaseWeight::new("Cardiology", 25),
        DiseaseWeight::new("Neurology", 20),
        DiseaseWeight::new("Endocrinology", 15),
    ]
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_patients: 250,
            clean_ratio: 0.40,
            resolved_queries: 50,
            as_of: default_as_of(),
            sites: default_sites(),
            diseases: default_diseases(),
            show_progress: false,
        }
    }
}

impl GeneratorConfig {
    /// Check that the configuration can produce a dataset
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.clean_ratio) {
            return Err(TrialError::config(format!(
                "clean_ratio must be within [0, 1], got {}",
                self.clean_ratio
            )));
        }
        if self.sites.is_empty() {
            return Err(TrialError::config("at least one site is required"));
        }
        if self.diseases.iter().map(|d| u64::from(d.weight)).sum::<u64>() == 0 {
            return Err(TrialError::config(
                "at least one disease with a positive weight is required",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generator Configuration:")?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Patients: {}", self.num_patients)?;
        writeln!(f, "  Clean Ratio: {:.2}", self.clean_ratio)?;
        writeln!(f, "  Resolved Queries: {}", self.resolved_queries)?;
        writeln!(f, "  As Of: {}", self.as_of)?;
        writeln!(f, "  Sites: {}", self.sites.len())?;
        writeln!(f, "  Diseases: {}", self.diseases.len())
    }
}
