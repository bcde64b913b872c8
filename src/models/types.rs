//! Common domain type definitions
//!
//! Categorical labels shared by patient, site and query records. Each label
//! serializes as its display string so exported tables carry the same text
//! the dashboard shows ("Clean", "Not Clean", "High", ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrialError;

/// Binary clean/not-clean classification of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum CleanStatus {
    /// No missing visits, no open queries, no safety issues, forms verified
    Clean,
    /// At least one clean condition failed
    NotClean,
}

impl CleanStatus {
    /// All statuses in display order
    pub const ALL: [Self; 2] = [Self::Clean, Self::NotClean];

    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::NotClean => "Not Clean",
        }
    }

    /// Whether this is the clean label
    #[must_use]
    pub const fn is_clean(self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl FromStr for CleanStatus {
    type Err = TrialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clean" => Ok(Self::Clean),
            "not clean" | "not_clean" | "notclean" => Ok(Self::NotClean),
            _ => Err(TrialError::invalid_value("clean_status", format!("unknown label '{s}'"))),
        }
    }
}

/// Patient risk derived from the DQI score
///
/// Variants are ordered by severity: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum RiskLevel {
    /// DQI at or above the warning breakpoint
    Low,
    /// DQI between the critical and warning breakpoints
    Medium,
    /// DQI below the critical breakpoint
    High,
}

impl RiskLevel {
    /// All levels in ascending severity
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = TrialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TrialError::invalid_value("risk_level", format!("unknown label '{s}'"))),
        }
    }
}

/// Categorical status of a site or of a batch metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum PerformanceStatus {
    /// At or above the target breakpoint
    Good,
    /// Between the critical and target breakpoints
    Warning,
    /// Below the critical breakpoint
    Critical,
    /// Nothing to classify, such as a site without patients
    Unknown,
}

impl PerformanceStatus {
    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }

    /// Monitoring priority matching this status
    #[must_use]
    pub const fn priority(self) -> PriorityLevel {
        match self {
            Self::Critical => PriorityLevel::High,
            Self::Warning => PriorityLevel::Medium,
            Self::Good | Self::Unknown => PriorityLevel::Low,
        }
    }

    /// Whether the status calls for monitoring attention
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Critical | Self::Warning)
    }
}

impl FromStr for PerformanceStatus {
    type Err = TrialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            "unknown" => Ok(Self::Unknown),
            _ => Err(TrialError::invalid_value(
                "performance_status",
                format!("unknown label '{s}'"),
            )),
        }
    }
}

/// Monitoring priority of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum PriorityLevel {
    /// Routine monitoring
    Low,
    /// Monitoring visit should be scheduled
    Medium,
    /// Immediate attention
    High,
}

impl PriorityLevel {
    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for PriorityLevel {
    type Err = TrialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TrialError::invalid_value("priority_level", format!("unknown label '{s}'"))),
        }
    }
}

/// Lifecycle state of a data-clarification query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum QueryStatus {
    /// Awaiting a response from the site
    Open,
    /// Answered and closed
    Resolved,
}

impl QueryStatus {
    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Resolved => "Resolved",
        }
    }
}

impl FromStr for QueryStatus {
    type Err = TrialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "resolved" | "closed" => Ok(Self::Resolved),
            _ => Err(TrialError::invalid_value("query_status", format!("unknown label '{s}'"))),
        }
    }
}

/// Priority assigned to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum QueryPriority {
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    High,
}

impl QueryPriority {
    /// All priorities in ascending order
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for QueryPriority {
    type Err = TrialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TrialError::invalid_value("query_priority", format!("unknown label '{s}'"))),
        }
    }
}

// Display, string conversion and serde glue shared by every label type
macro_rules! impl_label_conversions {
    ($($label:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $label {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl From<$label> for &'static str {
                fn from(value: $label) -> Self {
                    value.as_str()
                }
            }

            impl TryFrom<String> for $label {
                type Error = TrialError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )+
    };
}

impl_label_conversions!(
    CleanStatus,
    RiskLevel,
    PerformanceStatus,
    PriorityLevel,
    QueryStatus,
    QueryPriority,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("not clean".parse::<CleanStatus>().unwrap(), CleanStatus::NotClean);
        assert_eq!(" HIGH ".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!("closed".parse::<QueryStatus>().unwrap(), QueryStatus::Resolved);
        assert!("excellent".parse::<PerformanceStatus>().is_err());
    }

    #[test]
    fn test_risk_levels_order_by_severity() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_performance_maps_to_priority() {
        assert_eq!(PerformanceStatus::Critical.priority(), PriorityLevel::High);
        assert!(PerformanceStatus::Warning.needs_attention());
        assert!(!PerformanceStatus::Good.needs_attention());
        assert!(!PerformanceStatus::Unknown.needs_attention());
        assert_eq!(PerformanceStatus::Unknown.priority(), PriorityLevel::Low);
    }
}
