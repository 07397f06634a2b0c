//! Optional machine-learned condition predictor.
//!
//! A multinomial naive Bayes model over TF-IDF unigram/bigram features, trained from the
//! reference table and persisted as JSON. Callers go through [`ConditionPredictor`]; a
//! missing or unreadable model yields sentinel predictions rather than errors.

mod error;
mod features;
mod model;
mod predictor;

pub use error::{PredictorError, Result};
pub use features::terms;
pub use model::{
    training_examples, ModelMetadata, NaiveBayesModel, TrainOptions, TrainingExample,
    MODEL_FILE_NAME, MODEL_SCHEMA_VERSION, MODEL_TYPE,
};
pub use predictor::{
    ConditionPredictor, ModelInfo, Prediction, PredictionStatus, SymptomPrediction,
    SymptomPredictor, COMBINED_SYMPTOMS, ERROR_LABEL, UNAVAILABLE_LABEL,
};
