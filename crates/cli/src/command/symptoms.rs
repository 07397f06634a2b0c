use symptom_dataset::ReferenceTable;
use symptom_search::VocabularySearch;

use crate::config::DisplayConfig;
use crate::report::{body_region, title_case};

/// Vocabulary listing: fuzzy-filtered when `query` is given, otherwise an alphabetical
/// preview followed by an overflow line.
pub(crate) fn render_vocabulary(
    table: &ReferenceTable,
    query: Option<&str>,
    limit: Option<usize>,
    display: &DisplayConfig,
) -> String {
    let vocabulary = table.vocabulary();
    let limit = limit.unwrap_or(display.vocabulary_preview);
    let query = query.unwrap_or("").trim();

    let hits = VocabularySearch::new().search(query, &vocabulary, limit);
    let mut text = String::new();
    if hits.is_empty() {
        text.push_str(&format!("No symptoms match '{query}'.\n"));
        return text;
    }
    text.push_str(&format!("Available symptoms ({}):\n", vocabulary.len()));
    for hit in &hits {
        text.push_str(&format!(
            "  - {} [{}]\n",
            title_case(&hit.symptom),
            body_region(&hit.symptom)
        ));
    }
    if query.is_empty() && vocabulary.len() > hits.len() {
        text.push_str(&format!("  ... and {} more\n", vocabulary.len() - hits.len()));
    }
    text
}

pub(crate) fn render_quick_picks(display: &DisplayConfig) -> String {
    let mut text = String::from("Quick picks:\n");
    for pick in &display.quick_picks {
        text.push_str(&format!("  - {} [{}]\n", title_case(pick), body_region(pick)));
    }
    text
}
