use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyHit {
    pub symptom: String,
    /// Score relative to the best hit, in `0.0..=1.0`.
    pub score: f32,
}

/// Fuzzy search over the symptom vocabulary using nucleo-matcher
pub struct VocabularySearch {
    matcher: Matcher,
}

impl VocabularySearch {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Rank vocabulary entries against `query`, best first. Equal scores keep vocabulary
    /// order. A blank query returns the first `limit` entries unscored (score 1.0).
    pub fn search(&mut self, query: &str, vocabulary: &[&str], limit: usize) -> Vec<VocabularyHit> {
        let query = query.trim();
        if query.is_empty() {
            return vocabulary
                .iter()
                .take(limit)
                .map(|symptom| VocabularyHit {
                    symptom: (*symptom).to_string(),
                    score: 1.0,
                })
                .collect();
        }

        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

        let mut scored: Vec<(usize, u32)> = vocabulary
            .iter()
            .enumerate()
            .filter_map(|(idx, symptom)| {
                let haystack = Utf32String::from(*symptom);
                let score = pattern.score(haystack.slice(..), &mut self.matcher)?;
                Some((idx, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        // Normalize scores to 0-1 range (nucleo scores are u32)
        let max_score = scored.first().map(|(_, s)| *s as f32).unwrap_or(1.0);

        scored
            .into_iter()
            .map(|(idx, score)| VocabularyHit {
                symptom: vocabulary[idx].to_string(),
                score: if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                },
            })
            .collect()
    }
}

impl Default for VocabularySearch {
    fn default() -> Self {
        Self::new()
    }
}
