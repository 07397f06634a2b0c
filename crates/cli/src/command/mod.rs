use anyhow::{Context, Result};
use std::path::PathBuf;
use symptom_dataset::{load_csv, DatasetError, ReferenceTable};
use symptom_predictor::{PredictorError, SymptomPredictor};
use symptom_protocol::ErrorEnvelope;

use crate::config::{Config, LoadedConfig, INVALID_CONFIG};

pub(crate) mod capabilities;
pub(crate) mod check;
pub(crate) mod predict;
pub(crate) mod stats;
pub(crate) mod symptoms;

/// Top-level context for rejected user input; error classification keys on it.
pub(crate) const INVALID_INPUT: &str = "Invalid input";

/// Resolved configuration shared by every subcommand. The dataset is read on demand so
/// commands that do not need it keep working without one.
pub(crate) struct Session {
    pub config: Config,
    pub config_source: Option<PathBuf>,
}

impl Session {
    pub fn new(loaded: LoadedConfig) -> Self {
        Self {
            config: loaded.config,
            config_source: loaded.source,
        }
    }

    pub fn load_table(&self) -> Result<ReferenceTable> {
        let path = &self.config.dataset.path;
        load_csv(path).with_context(|| format!("Failed to load dataset {}", path.display()))
    }

    /// A predictor over the configured model directory, loaded if a model exists.
    pub fn predictor(&self, table: Option<&ReferenceTable>) -> SymptomPredictor {
        let mut predictor = SymptomPredictor::new(&self.config.predictor.model_dir);
        if predictor.load() && is_stale(&predictor, table) {
            log::warn!(
                "Predictor model in {} was trained on a different dataset; run `symptom-checker train` to refresh it",
                predictor.model_dir().display()
            );
        }
        predictor
    }
}

pub(crate) fn is_stale(predictor: &SymptomPredictor, table: Option<&ReferenceTable>) -> bool {
    match (predictor.model(), table) {
        (Some(model), Some(table)) => model.metadata().dataset_fingerprint != table.fingerprint(),
        _ => false,
    }
}

pub(crate) fn classify_error(err: &anyhow::Error) -> ErrorEnvelope {
    let message = format!("{err:#}");
    if err.chain().any(|cause| cause.is::<DatasetError>()) {
        return ErrorEnvelope::new("dataset_error", message).with_hint(
            "Pass --dataset or set SYMPTOM_CHECKER_DATASET to a CSV with symptom and condition columns",
        );
    }
    if err.chain().any(|cause| cause.is::<PredictorError>()) {
        return ErrorEnvelope::new("predictor_error", message)
            .with_hint("Run `symptom-checker train` to rebuild the model");
    }
    match err.to_string().as_str() {
        INVALID_CONFIG => ErrorEnvelope::new("invalid_config", message)
            .with_hint("Fix the reported key in the TOML config file"),
        INVALID_INPUT => ErrorEnvelope::new("invalid_input", message),
        _ => ErrorEnvelope::new("internal_error", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    #[test]
    fn dataset_errors_are_classified_through_context() {
        let err = anyhow::Error::new(DatasetError::MissingColumn {
            origin: "symptoms.csv".to_string(),
            column: "condition",
        })
        .context("Failed to load dataset symptoms.csv");
        let envelope = classify_error(&err);
        assert_eq!(envelope.code, "dataset_error");
        assert!(envelope.message.contains("condition"));
        assert!(envelope.hint.is_some());
    }

    #[test]
    fn config_and_input_errors_use_their_context() {
        let err = anyhow!("display.stats_top must be greater than zero").context(INVALID_CONFIG);
        let envelope = classify_error(&err);
        assert_eq!(envelope.code, "invalid_config");
        assert!(envelope.message.contains("display.stats_top"));

        let err = anyhow!("unknown quick pick 'x'").context(INVALID_INPUT);
        assert_eq!(classify_error(&err).code, "invalid_input");
        assert_eq!(classify_error(&anyhow!("boom")).code, "internal_error");
    }
}
