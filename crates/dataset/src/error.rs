use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Dataset {origin} is missing required column '{column}'")]
    MissingColumn { origin: String, column: &'static str },

    #[error("Dataset {origin} line {line}: empty {field}")]
    EmptyField {
        origin: String,
        line: u64,
        field: &'static str,
    },

    #[error("CSV error in {origin}: {error}")]
    Csv {
        origin: String,
        #[source]
        error: csv::Error,
    },
}
