use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Weight used when an external severity label is not one of the known levels.
pub const UNKNOWN_SEVERITY_WEIGHT: u8 = 2;

/// Severity of a condition, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Ranking weight: Critical=4, High=3, Medium=2, Low=1.
    #[must_use]
    pub const fn weight(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a label case-insensitively, ignoring surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(label))
    }

    /// Severity assumed for a condition when the dataset carries no severity column.
    #[must_use]
    pub fn default_for_condition(condition: &str) -> Self {
        match condition.trim() {
            "Heart Attack" => Self::Critical,
            "Pneumonia" | "COVID-19" | "Appendicitis" | "Malaria" => Self::High,
            "Migraine" | "Flu" | "Asthma" => Self::Medium,
            "Common Cold" | "Allergies" | "Tension Headache" => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// Weight of an arbitrary severity label; unknown labels weigh as Medium.
#[must_use]
pub fn label_weight(label: &str) -> u8 {
    Severity::from_label(label).map_or(UNKNOWN_SEVERITY_WEIGHT, Severity::weight)
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            format!("unknown severity '{s}' (expected Critical, High, Medium or Low)")
        })
    }
}
