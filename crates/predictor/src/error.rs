use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictorError>;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Model not found: {0}")]
    NotFound(PathBuf),

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training data has no usable features")]
    EmptyVocabulary,

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}
