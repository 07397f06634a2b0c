use symptom_predictor::ConditionPredictor;
use symptom_protocol::{
    Capabilities, CapabilitiesDataset, CapabilitiesPredictor, CapabilitiesTool,
    CAPABILITIES_SCHEMA_VERSION,
};

use super::{is_stale, Session};

pub(crate) const REPORT_FORMATS: &[&str] = &["text", "json", "markdown"];
pub(crate) const COMMANDS: &[&str] = &[
    "check",
    "symptoms",
    "stats",
    "train",
    "predict",
    "capabilities",
    "schema",
];

/// Detect what this installation can do. A missing dataset is reported, not fatal.
pub(crate) fn detect(session: &Session) -> Capabilities {
    let table = match session.load_table() {
        Ok(table) => Some(table),
        Err(err) => {
            log::warn!("{err:#}");
            None
        }
    };
    let predictor = session.predictor(table.as_ref());
    let info = predictor.model_info();

    Capabilities {
        schema_version: CAPABILITIES_SCHEMA_VERSION,
        tool: CapabilitiesTool {
            name: "symptom-checker".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        config_path: session
            .config_source
            .as_ref()
            .map(|path| path.display().to_string()),
        dataset: table.as_ref().map(|table| CapabilitiesDataset {
            path: session.config.dataset.path.display().to_string(),
            records: table.len(),
            symptoms: table.vocabulary().len(),
            conditions: table.conditions().len(),
            fingerprint: table.fingerprint(),
        }),
        predictor: CapabilitiesPredictor {
            available: predictor.is_available(),
            model_path: info.model_path.display().to_string(),
            model_type: info.model_type,
            stale: is_stale(&predictor, table.as_ref()),
        },
        report_formats: REPORT_FORMATS.iter().map(|s| (*s).to_string()).collect(),
        commands: COMMANDS.iter().map(|s| (*s).to_string()).collect(),
    }
}
