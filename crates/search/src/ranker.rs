use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use symptom_dataset::Severity;

use crate::matcher::MatchResult;

/// Coarse confidence derived from how many symptoms corroborate a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    #[must_use]
    pub const fn from_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition aggregated over all user symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedCondition {
    pub condition: String,
    /// Number of distinct user symptoms that surfaced this condition.
    pub match_count: usize,
    pub severity: Severity,
}

impl CombinedCondition {
    #[must_use]
    pub fn confidence(&self) -> ConfidenceTier {
        ConfidenceTier::from_count(self.match_count)
    }
}

/// Aggregate per-symptom matches and rank by `(severity weight, match count)`, both
/// descending. Conditions that tie on both keep the order in which they were first seen.
#[must_use]
pub fn combine(matches: &MatchResult) -> Vec<CombinedCondition> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut combined: Vec<CombinedCondition> = Vec::new();

    for entry in matches.iter() {
        for hit in &entry.matches {
            match slots.get(hit.condition.as_str()) {
                Some(&slot) => {
                    let existing = &mut combined[slot];
                    existing.match_count += 1;
                    existing.severity = hit.severity;
                }
                None => {
                    slots.insert(hit.condition.as_str(), combined.len());
                    combined.push(CombinedCondition {
                        condition: hit.condition.clone(),
                        match_count: 1,
                        severity: hit.severity,
                    });
                }
            }
        }
    }

    // `sort_by` is stable, so equal keys stay in first-seen order.
    combined.sort_by(|a, b| {
        (b.severity.weight(), b.match_count).cmp(&(a.severity.weight(), a.match_count))
    });
    log::debug!(
        "Ranked {} conditions from {} symptoms",
        combined.len(),
        matches.len()
    );
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::ConditionMatch;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn result(entries: &[(&str, &[(&str, Severity)])]) -> MatchResult {
        let mut out = MatchResult::default();
        for (symptom, hits) in entries {
            out.insert(
                *symptom,
                hits.iter()
                    .map(|(c, s)| ConditionMatch::new(*c, *s))
                    .collect(),
            );
        }
        out
    }

    fn summary(ranked: &[CombinedCondition]) -> Vec<(&str, usize, Severity)> {
        ranked
            .iter()
            .map(|c| (c.condition.as_str(), c.match_count, c.severity))
            .collect()
    }

    #[test]
    fn ranks_by_severity_then_count() {
        let matches = result(&[
            (
                "fever",
                &[("Flu", Severity::Medium), ("COVID-19", Severity::High)],
            ),
            ("cough", &[("COVID-19", Severity::High)]),
        ]);
        assert_eq!(
            summary(&combine(&matches)),
            vec![
                ("COVID-19", 2, Severity::High),
                ("Flu", 1, Severity::Medium)
            ]
        );
    }

    #[test]
    fn severity_outranks_count() {
        let matches = result(&[
            ("a", &[("Cold", Severity::Low), ("Stroke", Severity::Critical)]),
            ("b", &[("Cold", Severity::Low)]),
            ("c", &[("Cold", Severity::Low)]),
        ]);
        assert_eq!(
            summary(&combine(&matches)),
            vec![("Stroke", 1, Severity::Critical), ("Cold", 3, Severity::Low)]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let matches = result(&[
            ("a", &[("Zeta", Severity::Medium), ("Alpha", Severity::Medium)]),
            ("b", &[("Mid", Severity::Medium)]),
        ]);
        let expected = vec![
            ("Zeta", 1, Severity::Medium),
            ("Alpha", 1, Severity::Medium),
            ("Mid", 1, Severity::Medium),
        ];
        for _ in 0..5 {
            assert_eq!(summary(&combine(&matches)), expected);
        }
    }

    #[test]
    fn conflicting_severity_last_write_wins() {
        let matches = result(&[
            ("a", &[("Flu", Severity::Low)]),
            ("b", &[("Flu", Severity::High)]),
        ]);
        assert_eq!(summary(&combine(&matches)), vec![("Flu", 2, Severity::High)]);
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(combine(&MatchResult::default()).is_empty());
        assert!(combine(&result(&[("fever", &[])])).is_empty());
    }

    #[test]
    fn confidence_tiers() {
        assert_eq!(ConfidenceTier::from_count(0), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_count(1), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_count(2), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_count(3), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_count(17), ConfidenceTier::High);
    }

    proptest! {
        #[test]
        fn proptest_ranking_is_sorted_and_counts_add_up(
            lists in prop::collection::vec(
                prop::collection::btree_set(0usize..6, 0..6),
                0..6,
            )
        ) {
            // Severity per condition is fixed so the table invariant holds.
            let mut matches = MatchResult::default();
            let mut total = 0usize;
            for (idx, list) in lists.iter().enumerate() {
                let hits: Vec<ConditionMatch> = list
                    .iter()
                    .map(|c| ConditionMatch::new(format!("c{c}"), Severity::ALL[c % 4]))
                    .collect();
                total += hits.len();
                matches.insert(format!("s{idx}"), hits);
            }

            let ranked = combine(&matches);
            prop_assert_eq!(ranked.iter().map(|c| c.match_count).sum::<usize>(), total);
            for pair in ranked.windows(2) {
                let a = (pair[0].severity.weight(), pair[0].match_count);
                let b = (pair[1].severity.weight(), pair[1].match_count);
                prop_assert!(a >= b);
            }
        }
    }
}
