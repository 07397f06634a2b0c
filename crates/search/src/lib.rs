//! Symptom matching and condition ranking.
//!
//! ```text
//! raw symptoms ──normalize──> exact pass ──> partial pass ──> MatchResult
//!                                                               │
//!                                                    combine ───┴──> ranked conditions
//! ```

mod fuzzy;
mod matcher;
mod normalize;
mod ranker;
mod suggest;

pub use fuzzy::{VocabularyHit, VocabularySearch};
pub use matcher::{find_matches, ConditionMatch, MatchResult, SymptomMatcher, SymptomMatches};
pub use normalize::{normalize, significant_tokens, MIN_TOKEN_CHARS};
pub use ranker::{combine, CombinedCondition, ConfidenceTier};
pub use suggest::{suggest, DEFAULT_SUGGESTION_LIMIT};
