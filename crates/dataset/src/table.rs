use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::severity::Severity;

/// One `(symptom, condition, severity)` entry of the reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub symptom: String,
    pub condition: String,
    pub severity: Severity,
}

impl ReferenceRow {
    pub fn new(symptom: impl Into<String>, condition: impl Into<String>, severity: Severity) -> Self {
        Self {
            symptom: symptom.into(),
            condition: condition.into(),
            severity,
        }
    }
}

/// Immutable reference dataset.
///
/// A condition's severity is resolved once at construction: when several rows disagree,
/// the last row for that condition wins.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
    severities: HashMap<String, Severity>,
}

impl ReferenceTable {
    #[must_use]
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        let mut severities = HashMap::new();
        for row in &rows {
            if let Some(previous) = severities.insert(row.condition.clone(), row.severity) {
                if previous != row.severity {
                    log::debug!(
                        "Condition '{}' has conflicting severities ({previous} -> {}); keeping the last",
                        row.condition,
                        row.severity
                    );
                }
            }
        }
        Self { rows, severities }
    }

    #[must_use]
    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolved severity for a condition, if the condition appears in the table.
    #[must_use]
    pub fn severity_of(&self, condition: &str) -> Option<Severity> {
        self.severities.get(condition).copied()
    }

    /// Distinct symptoms, sorted alphabetically.
    #[must_use]
    pub fn vocabulary(&self) -> Vec<&str> {
        let mut symptoms: Vec<&str> = self
            .rows
            .iter()
            .map(|row| row.symptom.as_str())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        symptoms.sort_unstable();
        symptoms
    }

    /// Distinct conditions in first-seen order.
    #[must_use]
    pub fn conditions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.condition.as_str())
            .filter(|condition| seen.insert(*condition))
            .collect()
    }

    /// Lowercase hex SHA-256 over every row, in table order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use std::fmt::Write;

        let mut hasher = Sha256::new();
        for row in &self.rows {
            hasher.update(row.symptom.as_bytes());
            hasher.update([0x1f]);
            hasher.update(row.condition.as_bytes());
            hasher.update([0x1f]);
            hasher.update(row.severity.as_str().as_bytes());
            hasher.update([0x1e]);
        }
        let digest = hasher.finalize();
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}
