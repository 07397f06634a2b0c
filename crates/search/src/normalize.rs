use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens shorter than this never count as a token-overlap match.
pub const MIN_TOKEN_CHARS: usize = 3;

static NON_SYMPTOM_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("static regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Canonical comparison form of a symptom: lowercase, only word characters, whitespace and
/// hyphens, single spaces, no surrounding whitespace.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = NON_SYMPTOM_CHARS.replace_all(&lowered, "");
    let collapsed = WHITESPACE_RUNS.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Whitespace tokens of an already-normalized symptom long enough to count for overlap.
pub fn significant_tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}
