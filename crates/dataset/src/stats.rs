use std::collections::HashMap;

use serde::Serialize;

use crate::severity::Severity;
use crate::table::ReferenceTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomFrequency {
    pub symptom: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionFrequency {
    pub condition: String,
    pub count: usize,
    pub severity: Severity,
}

/// Summary counts over a reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub unique_symptoms: usize,
    pub unique_conditions: usize,
    pub total_records: usize,
    pub top_symptoms: Vec<SymptomFrequency>,
    pub top_conditions: Vec<ConditionFrequency>,
}

impl DatasetStats {
    /// Compute statistics, keeping the `top` most frequent symptoms and conditions.
    #[must_use]
    pub fn compute(table: &ReferenceTable, top: usize) -> Self {
        let symptom_counts = count_first_seen(table.rows().iter().map(|r| r.symptom.as_str()));
        let condition_counts =
            count_first_seen(table.rows().iter().map(|r| r.condition.as_str()));

        let unique_symptoms = symptom_counts.len();
        let unique_conditions = condition_counts.len();

        let top_symptoms = symptom_counts
            .into_iter()
            .take(top)
            .map(|(symptom, count)| SymptomFrequency {
                symptom: symptom.to_string(),
                count,
            })
            .collect();
        let top_conditions = condition_counts
            .into_iter()
            .take(top)
            .map(|(condition, count)| ConditionFrequency {
                condition: condition.to_string(),
                count,
                severity: table
                    .severity_of(condition)
                    .unwrap_or_else(|| Severity::default_for_condition(condition)),
            })
            .collect();

        Self {
            unique_symptoms,
            unique_conditions,
            total_records: table.len(),
            top_symptoms,
            top_conditions,
        }
    }
}

/// Occurrence counts sorted by count descending; equal counts keep first-seen order.
fn count_first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
