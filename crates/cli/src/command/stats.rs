use anyhow::Result;
use symptom_dataset::{DatasetStats, ReferenceTable};
use symptom_protocol::serialize_json_pretty;

use crate::report::render_stats_text;

pub(crate) fn render_stats(table: &ReferenceTable, top: usize, json: bool) -> Result<String> {
    let stats = DatasetStats::compute(table, top);
    if json {
        serialize_json_pretty(&stats)
    } else {
        Ok(render_stats_text(&stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use symptom_dataset::{ReferenceRow, Severity};

    fn table() -> ReferenceTable {
        ReferenceTable::from_rows(vec![
            ReferenceRow::new("fever", "Flu", Severity::Medium),
            ReferenceRow::new("fever", "COVID-19", Severity::High),
            ReferenceRow::new("cough", "COVID-19", Severity::High),
        ])
    }

    #[test]
    fn json_stats_carry_counts() {
        let raw = render_stats(&table(), 1, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["unique_symptoms"], 2);
        assert_eq!(value["unique_conditions"], 2);
        assert_eq!(value["total_records"], 3);
        assert_eq!(value["top_symptoms"][0]["symptom"], "fever");
        assert_eq!(value["top_conditions"][0]["condition"], "COVID-19");
        assert_eq!(value["top_conditions"][0]["severity"], "High");
        assert_eq!(value["top_conditions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn text_stats_list_totals() {
        let text = render_stats(&table(), 8, false).unwrap();
        assert!(text.starts_with("Unique symptoms:   2\n"));
        assert!(text.contains("Total records:     3"));
    }
}
