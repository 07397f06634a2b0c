use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DatasetError, Result};
use crate::severity::Severity;
use crate::table::{ReferenceRow, ReferenceTable};

const SYMPTOM_COLUMN: &str = "symptom";
const CONDITION_COLUMN: &str = "condition";
const SEVERITY_COLUMN: &str = "severity";

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    symptom: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    severity: Option<String>,
}

/// Load the reference dataset from a CSV file with `symptom`, `condition` and an optional
/// `severity` column.
pub fn load_csv(path: impl AsRef<Path>) -> Result<ReferenceTable> {
    let path = path.as_ref();
    log::info!("Loading reference dataset from {}", path.display());
    let file = File::open(path).map_err(|error| DatasetError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    let table = read_csv(file, &path.display().to_string())?;
    log::info!(
        "Loaded {} reference rows ({} conditions)",
        table.len(),
        table.conditions().len()
    );
    Ok(table)
}

/// Parse CSV from any reader. `origin` names the source in error messages.
///
/// Symptoms are lowercased and trimmed, conditions trimmed. Rows without a usable severity
/// fall back to [`Severity::default_for_condition`].
pub fn read_csv<R: Read>(reader: R, origin: &str) -> Result<ReferenceTable> {
    let csv_error = |error| DatasetError::Csv {
        origin: origin.to_string(),
        error,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    for column in [SYMPTOM_COLUMN, CONDITION_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn {
                origin: origin.to_string(),
                column,
            });
        }
    }
    let has_severity = headers.iter().any(|h| h == SEVERITY_COLUMN);
    if !has_severity {
        log::debug!("{origin} has no severity column; using the default condition mapping");
    }

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map_or(0, csv::Position::line);
        let raw: RawRow = record.deserialize(Some(&headers)).map_err(csv_error)?;

        let symptom = required(raw.symptom, origin, line, SYMPTOM_COLUMN)?.to_lowercase();
        let condition = required(raw.condition, origin, line, CONDITION_COLUMN)?;
        let severity = match raw.severity.as_deref().map(str::trim) {
            Some(label) if has_severity => Severity::from_label(label).unwrap_or_else(|| {
                log::warn!(
                    "{origin} line {line}: unrecognized severity '{label}' for '{condition}'; using default"
                );
                Severity::default_for_condition(&condition)
            }),
            _ => Severity::default_for_condition(&condition),
        };

        rows.push(ReferenceRow {
            symptom,
            condition,
            severity,
        });
    }

    Ok(ReferenceTable::from_rows(rows))
}

fn required(value: Option<String>, origin: &str, line: u64, field: &'static str) -> Result<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(DatasetError::EmptyField {
            origin: origin.to_string(),
            line,
            field,
        });
    }
    Ok(value)
}
