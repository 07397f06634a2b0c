use std::collections::HashSet;

use serde::Serialize;
use symptom_dataset::{ReferenceRow, ReferenceTable, Severity};

use crate::normalize::{normalize, significant_tokens};

/// A condition surfaced by one user symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionMatch {
    pub condition: String,
    pub severity: Severity,
}

impl ConditionMatch {
    pub fn new(condition: impl Into<String>, severity: Severity) -> Self {
        Self {
            condition: condition.into(),
            severity,
        }
    }
}

/// Matches for one raw user symptom, exact-pass hits first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomMatches {
    pub symptom: String,
    pub matches: Vec<ConditionMatch>,
}

/// Per-symptom matches, keyed by the raw symptom text in the order it was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    entries: Vec<SymptomMatches>,
}

impl MatchResult {
    /// Insert or replace the entry for `symptom`, keeping its original position.
    pub fn insert(&mut self, symptom: impl Into<String>, matches: Vec<ConditionMatch>) {
        let symptom = symptom.into();
        match self.entries.iter_mut().find(|e| e.symptom == symptom) {
            Some(entry) => entry.matches = matches,
            None => self.entries.push(SymptomMatches { symptom, matches }),
        }
    }

    #[must_use]
    pub fn get(&self, symptom: &str) -> Option<&[ConditionMatch]> {
        self.entries
            .iter()
            .find(|e| e.symptom == symptom)
            .map(|e| e.matches.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymptomMatches> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when at least one symptom matched at least one condition.
    #[must_use]
    pub fn has_matches(&self) -> bool {
        self.entries.iter().any(|e| !e.matches.is_empty())
    }

    /// Raw symptoms whose match list contains `condition`, in input order.
    #[must_use]
    pub fn symptoms_for(&self, condition: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.matches.iter().any(|m| m.condition == condition))
            .map(|e| e.symptom.as_str())
            .collect()
    }
}

struct PreparedRow<'a> {
    row: &'a ReferenceRow,
    normalized: String,
    tokens: Vec<String>,
}

impl PreparedRow<'_> {
    fn partially_matches(&self, needle: &str, needle_tokens: &[&str]) -> bool {
        self.normalized.contains(needle)
            || needle.contains(self.normalized.as_str())
            || needle_tokens
                .iter()
                .any(|token| self.tokens.iter().any(|t| t == token))
    }
}

/// Two-pass matcher over a reference table whose row symptoms are normalized once up front.
pub struct SymptomMatcher<'a> {
    table: &'a ReferenceTable,
    rows: Vec<PreparedRow<'a>>,
}

impl<'a> SymptomMatcher<'a> {
    #[must_use]
    pub fn new(table: &'a ReferenceTable) -> Self {
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                let normalized = normalize(&row.symptom);
                let tokens = normalized.split_whitespace().map(str::to_string).collect();
                PreparedRow {
                    row,
                    normalized,
                    tokens,
                }
            })
            .collect();
        Self { table, rows }
    }

    /// Match every user symptom. A symptom supplied twice is matched once.
    pub fn find_matches<S: AsRef<str>>(&self, user_symptoms: &[S]) -> MatchResult {
        let mut result = MatchResult::default();
        for raw in user_symptoms {
            let raw = raw.as_ref();
            if result.get(raw).is_some() {
                continue;
            }
            result.insert(raw, self.match_symptom(raw));
        }
        result
    }

    /// Exact pass, then partial pass, de-duplicated by condition (first occurrence wins).
    ///
    /// Containment is plain substring containment, so a symptom that normalizes to empty
    /// is contained in every row, and a row that normalizes to empty is contained in every
    /// symptom.
    #[must_use]
    pub fn match_symptom(&self, raw: &str) -> Vec<ConditionMatch> {
        let needle = normalize(raw);
        let needle_tokens: Vec<&str> = significant_tokens(&needle).collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut matches = Vec::new();

        for prepared in &self.rows {
            if prepared.normalized == needle && seen.insert(prepared.row.condition.as_str()) {
                matches.push(self.condition_match(prepared.row));
            }
        }
        let exact = matches.len();

        for prepared in &self.rows {
            if seen.contains(prepared.row.condition.as_str()) {
                continue;
            }
            if prepared.partially_matches(&needle, &needle_tokens) {
                seen.insert(prepared.row.condition.as_str());
                matches.push(self.condition_match(prepared.row));
            }
        }

        log::debug!(
            "Symptom '{raw}' -> '{needle}': {exact} exact, {} partial",
            matches.len() - exact
        );
        matches
    }

    fn condition_match(&self, row: &ReferenceRow) -> ConditionMatch {
        let severity = self.table.severity_of(&row.condition).unwrap_or(row.severity);
        ConditionMatch::new(row.condition.clone(), severity)
    }
}

/// Match raw user symptoms against the reference table.
pub fn find_matches<S: AsRef<str>>(user_symptoms: &[S], table: &ReferenceTable) -> MatchResult {
    SymptomMatcher::new(table).find_matches(user_symptoms)
}
