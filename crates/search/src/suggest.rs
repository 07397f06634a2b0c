use std::collections::HashSet;

use crate::normalize::{normalize, significant_tokens};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// "Did you mean" candidates for symptoms that surfaced no condition.
///
/// A vocabulary symptom is suggested when any significant token of a normalized user
/// symptom occurs inside it. Suggestions are unique and keep first-seen order.
#[must_use]
pub fn suggest<S: AsRef<str>>(user_symptoms: &[S], vocabulary: &[&str], limit: usize) -> Vec<String> {
    let candidates: Vec<(String, &str)> = vocabulary
        .iter()
        .map(|symptom| (normalize(symptom), *symptom))
        .collect();

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    for raw in user_symptoms {
        let normalized = normalize(raw.as_ref());
        let tokens: Vec<&str> = significant_tokens(&normalized).collect();
        if tokens.is_empty() {
            continue;
        }
        for (candidate, original) in &candidates {
            if suggestions.len() >= limit {
                return suggestions;
            }
            if tokens.iter().any(|token| candidate.contains(token)) && seen.insert(*original) {
                suggestions.push((*original).to_string());
            }
        }
    }
    suggestions
}
