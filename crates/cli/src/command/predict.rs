use anyhow::{Context, Result};
use std::path::Path;
use symptom_dataset::ReferenceTable;
use symptom_predictor::{ConditionPredictor, NaiveBayesModel, TrainOptions};
use symptom_protocol::{PredictOutput, ResponseStatus};

use super::check::card;

pub(crate) struct TrainSummary {
    pub path: std::path::PathBuf,
    pub examples: usize,
    pub features: usize,
    pub classes: usize,
}

impl TrainSummary {
    pub fn render(&self) -> String {
        format!(
            "Model saved to {} ({} examples, {} features, {} classes)",
            self.path.display(),
            self.examples,
            self.features,
            self.classes
        )
    }
}

pub(crate) fn train(table: &ReferenceTable, output_dir: &Path) -> Result<TrainSummary> {
    let model = NaiveBayesModel::train(table, TrainOptions::default())
        .context("Failed to train predictor model")?;
    let path = model
        .save(output_dir)
        .with_context(|| format!("Failed to write model into {}", output_dir.display()))?;
    log::info!("Trained predictor model written to {}", path.display());
    Ok(TrainSummary {
        path,
        examples: model.metadata().training_examples,
        features: model.features_count(),
        classes: model.classes().len(),
    })
}

pub(crate) fn predict(predictor: &impl ConditionPredictor, text: &str, top_k: usize) -> PredictOutput {
    let text = text.trim().to_string();
    PredictOutput {
        status: ResponseStatus::Ok,
        available: predictor.is_available(),
        predictions: predictor
            .top_predictions(&text, top_k)
            .into_iter()
            .map(|prediction| card(None, prediction))
            .collect(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use symptom_dataset::{ReferenceRow, Severity};
    use symptom_predictor::{SymptomPredictor, MODEL_FILE_NAME, UNAVAILABLE_LABEL};

    fn table() -> ReferenceTable {
        ReferenceTable::from_rows(vec![
            ReferenceRow::new("fever", "Flu", Severity::Medium),
            ReferenceRow::new("chills", "Flu", Severity::Medium),
            ReferenceRow::new("wheezing", "Asthma", Severity::Medium),
        ])
    }

    #[test]
    fn train_then_predict_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let summary = train(&table(), dir.path()).unwrap();
        assert_eq!(summary.path, dir.path().join(MODEL_FILE_NAME));
        assert_eq!(summary.classes, 2);
        assert_eq!(summary.examples, 4);

        let mut predictor = SymptomPredictor::new(dir.path());
        assert!(predictor.load());
        let out = predict(&predictor, "  wheezing ", 3);
        assert!(out.available);
        assert_eq!(out.text, "wheezing");
        assert_eq!(out.predictions[0].label, "Asthma");
        assert_eq!(out.predictions.len(), 2);
    }

    #[test]
    fn predict_without_model_reports_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let mut predictor = SymptomPredictor::new(dir.path());
        predictor.load();
        let out = predict(&predictor, "fever", 3);
        assert!(!out.available);
        assert_eq!(out.predictions.len(), 1);
        assert_eq!(out.predictions[0].label, UNAVAILABLE_LABEL);
        assert_eq!(out.predictions[0].status, "unavailable");
    }
}
