use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PredictorError;
use crate::model::{NaiveBayesModel, MODEL_FILE_NAME};

pub const COMBINED_SYMPTOMS: &str = "Combined symptoms";
pub const UNAVAILABLE_LABEL: &str = "Model not loaded";
pub const ERROR_LABEL: &str = "Prediction error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    Ok,
    Unavailable,
    Error,
}

impl PredictionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unavailable => "unavailable",
            Self::Error => "error",
        }
    }
}

/// A best-guess condition, or a zero-confidence sentinel when no model could answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub status: PredictionStatus,
    pub label: String,
    pub confidence: f64,
}

impl Prediction {
    pub fn condition(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            status: PredictionStatus::Ok,
            label: label.into(),
            confidence,
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            status: PredictionStatus::Unavailable,
            label: UNAVAILABLE_LABEL.to_string(),
            confidence: 0.0,
        }
    }

    #[must_use]
    pub fn error() -> Self {
        Self {
            status: PredictionStatus::Error,
            label: ERROR_LABEL.to_string(),
            confidence: 0.0,
        }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.status != PredictionStatus::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomPrediction {
    pub symptom: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub model_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_fingerprint: Option<String>,
}

/// The seam callers depend on; absence of a model is a normal state, never an error.
pub trait ConditionPredictor {
    fn is_available(&self) -> bool;

    fn predict(&self, text: &str) -> Prediction;

    /// Up to `k` predictions, best first. A single sentinel when no model can answer.
    fn top_predictions(&self, text: &str, k: usize) -> Vec<Prediction>;

    /// One prediction per symptom, plus a combined entry when several were given.
    fn predict_many(&self, symptoms: &[String]) -> Vec<SymptomPrediction> {
        let mut out: Vec<SymptomPrediction> = symptoms
            .iter()
            .map(|symptom| SymptomPrediction {
                symptom: symptom.clone(),
                prediction: self.predict(symptom),
            })
            .collect();
        if symptoms.len() > 1 {
            out.push(SymptomPrediction {
                symptom: COMBINED_SYMPTOMS.to_string(),
                prediction: self.predict(&symptoms.join(" ")),
            });
        }
        out
    }
}

/// File-backed predictor, constructed unloaded.
pub struct SymptomPredictor {
    model_dir: PathBuf,
    model: Option<NaiveBayesModel>,
    loaded: bool,
}

impl SymptomPredictor {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            model: None,
            loaded: false,
        }
    }

    /// Wrap an in-memory model; the predictor starts loaded.
    pub fn with_model(model_dir: impl Into<PathBuf>, model: NaiveBayesModel) -> Self {
        Self {
            model_dir: model_dir.into(),
            model: Some(model),
            loaded: true,
        }
    }

    /// Load the model from disk. Returns whether a model is available; calling again once
    /// loaded is a no-op.
    pub fn load(&mut self) -> bool {
        if self.loaded {
            return true;
        }
        match NaiveBayesModel::load(&self.model_dir) {
            Ok(model) => {
                self.model = Some(model);
                self.loaded = true;
            }
            Err(PredictorError::NotFound(path)) => {
                log::debug!("No predictor model at {}", path.display());
            }
            Err(err) => {
                log::warn!(
                    "Failed to load predictor model from {}: {err}",
                    self.model_dir.display()
                );
            }
        }
        self.loaded
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    #[must_use]
    pub fn model(&self) -> Option<&NaiveBayesModel> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn model_info(&self) -> ModelInfo {
        let mut info = ModelInfo {
            loaded: self.loaded,
            model_path: self.model_dir.join(MODEL_FILE_NAME),
            model_type: None,
            created_at: None,
            description: None,
            features_count: None,
            classes_count: None,
            dataset_fingerprint: None,
        };
        if let Some(model) = &self.model {
            let meta = model.metadata();
            info.model_type = Some(meta.model_type.clone());
            info.created_at = Some(meta.created_at);
            info.description = Some(meta.description.clone());
            info.features_count = Some(meta.features_count);
            info.classes_count = Some(meta.classes_count);
            info.dataset_fingerprint = Some(meta.dataset_fingerprint.clone());
        }
        info
    }

    fn ranked(&self, text: &str) -> Option<Result<Vec<(String, f64)>, PredictorError>> {
        let model = self.model.as_ref().filter(|_| self.loaded)?;
        Some(model.predict_proba(text.to_lowercase().trim()))
    }
}

impl ConditionPredictor for SymptomPredictor {
    fn is_available(&self) -> bool {
        self.loaded
    }

    fn predict(&self, text: &str) -> Prediction {
        match self.ranked(text) {
            None => Prediction::unavailable(),
            Some(Ok(ranked)) => ranked
                .into_iter()
                .next()
                .map_or_else(Prediction::error, |(label, p)| Prediction::condition(label, p)),
            Some(Err(err)) => {
                log::warn!("Prediction failed for '{text}': {err}");
                Prediction::error()
            }
        }
    }

    fn top_predictions(&self, text: &str, k: usize) -> Vec<Prediction> {
        match self.ranked(text) {
            None => vec![Prediction::unavailable()],
            Some(Ok(ranked)) => ranked
                .into_iter()
                .take(k)
                .map(|(label, p)| Prediction::condition(label, p))
                .collect(),
            Some(Err(err)) => {
                log::warn!("Prediction failed for '{text}': {err}");
                vec![Prediction::error()]
            }
        }
    }
}
