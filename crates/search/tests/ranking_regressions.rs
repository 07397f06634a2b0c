use pretty_assertions::assert_eq;
use symptom_dataset::{read_csv, ReferenceTable, Severity};
use symptom_search::{combine, find_matches, suggest, ConditionMatch, ConfidenceTier};

const DATASET: &str = "\
symptom,condition,severity
fever,Flu,Medium
fever,COVID-19,High
cough,COVID-19,High
cough,Common Cold,Low
sore throat,Common Cold,Low
sore throat,Strep Throat,Medium
chest pain,Heart Attack,Critical
shortness of breath,Heart Attack,Critical
shortness of breath,Asthma,Medium
headache,Migraine,Medium
headache,Tension Headache,Low
";

fn table() -> ReferenceTable {
    read_csv(DATASET.as_bytes(), "fixture").expect("fixture parses")
}

#[test]
fn documented_example_ranks_covid_first() {
    let table = read_csv(
        "symptom,condition,severity\nfever,Flu,Medium\nfever,COVID-19,High\ncough,COVID-19,High\n"
            .as_bytes(),
        "example",
    )
    .unwrap();
    let matches = find_matches(&["fever", "cough"], &table);
    assert_eq!(
        matches.get("fever").unwrap(),
        &[
            ConditionMatch::new("Flu", Severity::Medium),
            ConditionMatch::new("COVID-19", Severity::High),
        ]
    );
    let ranked: Vec<(String, usize, Severity)> = combine(&matches)
        .into_iter()
        .map(|c| (c.condition, c.match_count, c.severity))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("COVID-19".to_string(), 2, Severity::High),
            ("Flu".to_string(), 1, Severity::Medium),
        ]
    );
}

#[test]
fn repeated_condition_counts_once_per_symptom() {
    let table = read_csv(
        "symptom,condition,severity\nfever,Flu,Medium\nfever,Flu,Medium\nhigh fever,Flu,Medium\nhigh fever,Malaria,High\n"
            .as_bytes(),
        "duplicates",
    )
    .unwrap();
    let matches = find_matches(&["fever"], &table);
    assert_eq!(
        matches.get("fever").unwrap(),
        &[
            ConditionMatch::new("Flu", Severity::Medium),
            ConditionMatch::new("Malaria", Severity::High),
        ]
    );
    let ranked: Vec<(String, usize, Severity)> = combine(&matches)
        .into_iter()
        .map(|c| (c.condition, c.match_count, c.severity))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Malaria".to_string(), 1, Severity::High),
            ("Flu".to_string(), 1, Severity::Medium),
        ]
    );
}

#[test]
fn free_text_symptoms_rank_pinned_order() {
    let table = table();
    let matches = find_matches(&["Chest pain!", "short of breath", "Fever", "cough"], &table);
    let ranked = combine(&matches);
    let order: Vec<(&str, usize, ConfidenceTier)> = ranked
        .iter()
        .map(|c| (c.condition.as_str(), c.match_count, c.confidence()))
        .collect();

    // "short of breath" only overlaps through the "breath" token.
    assert_eq!(
        order,
        vec![
            ("Heart Attack", 2, ConfidenceTier::Medium),
            ("COVID-19", 2, ConfidenceTier::Medium),
            ("Asthma", 1, ConfidenceTier::Low),
            ("Flu", 1, ConfidenceTier::Low),
            ("Common Cold", 1, ConfidenceTier::Low),
        ]
    );
}

#[test]
fn unmatched_symptoms_fall_back_to_suggestions() {
    let table = table();
    let matches = find_matches(&["throb", "xx"], &table);
    assert!(!matches.has_matches());
    assert!(combine(&matches).is_empty());

    let suggestions = suggest(&["throats"], &table.vocabulary(), 6);
    assert!(suggestions.is_empty());
    let suggestions = suggest(&["ache"], &table.vocabulary(), 6);
    assert_eq!(suggestions, vec!["headache"]);
}
