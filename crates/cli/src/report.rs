use symptom_dataset::DatasetStats;
use symptom_protocol::{CheckOutput, PredictOutput, PredictionCard};
use symptom_search::normalize;

pub const DISCLAIMER: &str = "This tool is for informational purposes only and is not a \
substitute for professional medical advice. Always consult a qualified healthcare provider.";

const BODY_REGIONS: &[(&str, &str)] = &[
    ("headache", "Head"),
    ("fever", "Whole Body"),
    ("cough", "Respiratory"),
    ("sore throat", "Throat"),
    ("chest pain", "Chest"),
    ("stomach pain", "Abdomen"),
    ("nausea", "Digestive"),
    ("dizziness", "Head"),
    ("fatigue", "Whole Body"),
    ("muscle aches", "Muscles"),
    ("joint pain", "Joints"),
    ("skin rash", "Skin"),
];

pub const GENERAL_REGION: &str = "General";

/// Coarse body region for display, by substring containment in either direction.
pub fn body_region(symptom: &str) -> &'static str {
    let normalized = normalize(symptom);
    if normalized.is_empty() {
        return GENERAL_REGION;
    }
    BODY_REGIONS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword) || keyword.contains(normalized.as_str()))
        .map_or(GENERAL_REGION, |(_, region)| *region)
}

pub fn render_check_text(out: &CheckOutput) -> String {
    let mut text = String::new();
    text.push_str("Reported symptoms:\n");
    for card in &out.symptoms {
        text.push_str(&format!("  - {} [{}]\n", title_case(&card.symptom), card.body_region));
    }
    text.push('\n');

    if out.conditions.is_empty() {
        text.push_str("No direct matches found.\n");
        if out.suggestions.is_empty() {
            text.push_str("Try more common medical terms, or run `symptom-checker symptoms`.\n");
        } else {
            text.push_str("Did you mean:\n");
            for suggestion in &out.suggestions {
                text.push_str(&format!(
                    "  - {} [{}]\n",
                    title_case(suggestion),
                    body_region(suggestion)
                ));
            }
        }
    } else {
        text.push_str(&format!("Possible conditions ({}):\n", out.conditions.len()));
        for (idx, card) in out.conditions.iter().enumerate() {
            text.push_str(&format!(
                "{:>3}. {}  severity={} confidence={} matches={}\n",
                idx + 1,
                card.condition,
                card.severity,
                card.confidence,
                card.match_count
            ));
            text.push_str(&format!(
                "     matched: {}\n",
                card.matched_symptoms.join(", ")
            ));
        }
        text.push('\n');
        text.push_str("Breakdown:\n");
        for entry in &out.breakdown {
            if entry.conditions.is_empty() {
                text.push_str(&format!(
                    "  {} -> no direct matches\n",
                    title_case(&entry.symptom)
                ));
                continue;
            }
            text.push_str(&format!(
                "  {} -> {} possible condition(s)\n",
                title_case(&entry.symptom),
                entry.conditions.len() + entry.more
            ));
            for condition in &entry.conditions {
                text.push_str(&format!(
                    "    * {} ({} severity)\n",
                    condition.condition, condition.severity
                ));
            }
            if entry.more > 0 {
                text.push_str(&format!("    ... and {} more\n", entry.more));
            }
        }
    }

    if let Some(predictions) = &out.predictions {
        text.push('\n');
        text.push_str("Model predictions:\n");
        text.push_str(&render_prediction_lines(predictions));
    }

    text.push('\n');
    text.push_str(DISCLAIMER);
    text
}

pub fn render_check_markdown(out: &CheckOutput) -> String {
    let mut md = String::new();
    md.push_str("# Symptom check report\n\n");
    md.push_str("## Reported symptoms\n\n");
    for card in &out.symptoms {
        md.push_str(&format!(
            "- {} ({})\n",
            escape_cell(&title_case(&card.symptom)),
            card.body_region
        ));
    }
    md.push('\n');

    if out.conditions.is_empty() {
        md.push_str("## No direct matches\n\n");
        if !out.suggestions.is_empty() {
            md.push_str("Did you mean:\n\n");
            for suggestion in &out.suggestions {
                md.push_str(&format!("- {}\n", escape_cell(&title_case(suggestion))));
            }
            md.push('\n');
        }
    } else {
        md.push_str("## Possible conditions\n\n");
        md.push_str("| # | condition | severity | confidence | matches | matched symptoms |\n");
        md.push_str("|---:|---|---|---|---:|---|\n");
        for (idx, card) in out.conditions.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                idx + 1,
                escape_cell(&card.condition),
                card.severity,
                card.confidence,
                card.match_count,
                escape_cell(&card.matched_symptoms.join(", "))
            ));
        }
        md.push('\n');

        md.push_str("## Breakdown\n\n");
        for entry in &out.breakdown {
            md.push_str(&format!("### {}\n\n", escape_cell(&title_case(&entry.symptom))));
            if entry.conditions.is_empty() {
                md.push_str("No direct matches.\n\n");
                continue;
            }
            for condition in &entry.conditions {
                md.push_str(&format!(
                    "- {} ({} severity)\n",
                    escape_cell(&condition.condition),
                    condition.severity
                ));
            }
            if entry.more > 0 {
                md.push_str(&format!("- ... and {} more\n", entry.more));
            }
            md.push('\n');
        }
    }

    if let Some(predictions) = &out.predictions {
        md.push_str("## Model predictions\n\n");
        md.push_str("| input | prediction | confidence |\n");
        md.push_str("|---|---|---:|\n");
        for card in predictions {
            md.push_str(&format!(
                "| {} | {} | `{:.3}` |\n",
                escape_cell(card.symptom.as_deref().unwrap_or("")),
                escape_cell(&card.label),
                card.confidence
            ));
        }
        md.push('\n');
    }

    md.push_str(&format!("> {DISCLAIMER}\n"));
    md
}

pub fn render_predict_text(out: &PredictOutput) -> String {
    let mut text = format!("Predictions for \"{}\":\n", out.text);
    text.push_str(&render_prediction_lines(&out.predictions));
    text
}

fn render_prediction_lines(predictions: &[PredictionCard]) -> String {
    let mut text = String::new();
    for card in predictions {
        let prefix = card
            .symptom
            .as_deref()
            .map(|symptom| format!("{symptom}: "))
            .unwrap_or_default();
        text.push_str(&format!(
            "  - {prefix}{} ({:.1}%)\n",
            card.label,
            card.confidence * 100.0
        ));
    }
    text
}

pub fn render_stats_text(stats: &DatasetStats) -> String {
    let mut text = String::new();
    text.push_str(&format!("Unique symptoms:   {}\n", stats.unique_symptoms));
    text.push_str(&format!("Unique conditions: {}\n", stats.unique_conditions));
    text.push_str(&format!("Total records:     {}\n", stats.total_records));

    text.push_str("\nMost common symptoms:\n");
    for entry in &stats.top_symptoms {
        text.push_str(&format!(
            "  {:<28} {}\n",
            title_case(&entry.symptom),
            entry.count
        ));
    }
    text.push_str("\nMost common conditions:\n");
    for entry in &stats.top_conditions {
        text.push_str(&format!(
            "  {:<28} {:<3} {}\n",
            entry.condition, entry.count, entry.severity
        ));
    }
    text
}

pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
