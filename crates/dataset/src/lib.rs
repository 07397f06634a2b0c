//! # Symptom Dataset
//!
//! The reference table the matcher runs against: `(symptom, condition, severity)` rows loaded
//! once from CSV and never mutated afterwards.
//!
//! ```no_run
//! use symptom_dataset::load_csv;
//!
//! let table = load_csv("symptoms.csv")?;
//! println!("{} rows, {} conditions", table.len(), table.conditions().len());
//! # Ok::<(), symptom_dataset::DatasetError>(())
//! ```

mod error;
mod loader;
mod severity;
mod stats;
mod table;

pub use error::{DatasetError, Result};
pub use loader::{load_csv, read_csv};
pub use severity::{label_weight, Severity, UNKNOWN_SEVERITY_WEIGHT};
pub use stats::{ConditionFrequency, DatasetStats, SymptomFrequency};
pub use table::{ReferenceRow, ReferenceTable};
