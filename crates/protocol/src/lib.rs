use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CAPABILITIES_SCHEMA_VERSION: u32 = 1;
pub const CHECK_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct SymptomCard {
    pub symptom: String,
    pub body_region: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ConditionCard {
    pub condition: String,
    pub severity: String,
    pub severity_weight: u8,
    pub confidence: String,
    pub match_count: usize,
    /// Reported symptoms that led to this condition, in input order.
    pub matched_symptoms: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct BreakdownEntry {
    pub condition: String,
    pub severity: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct SymptomBreakdown {
    pub symptom: String,
    pub conditions: Vec<BreakdownEntry>,
    /// Matches beyond the displayed `conditions`.
    #[serde(default)]
    pub more: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct PredictionCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptom: Option<String>,
    pub status: String,
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct CheckOutput {
    pub schema_version: u32,
    pub status: ResponseStatus,
    pub symptoms: Vec<SymptomCard>,
    pub conditions: Vec<ConditionCard>,
    pub breakdown: Vec<SymptomBreakdown>,
    /// "Did you mean" symptoms, only filled when nothing matched.
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<PredictionCard>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct PredictOutput {
    pub status: ResponseStatus,
    pub text: String,
    pub available: bool,
    pub predictions: Vec<PredictionCard>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct CapabilitiesTool {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct CapabilitiesDataset {
    pub path: String,
    pub records: usize,
    pub symptoms: usize,
    pub conditions: usize,
    pub fingerprint: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct CapabilitiesPredictor {
    pub available: bool,
    pub model_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    /// Set when the model was trained on a different dataset than the one loaded.
    #[serde(default)]
    pub stale: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct Capabilities {
    pub schema_version: u32,
    pub tool: CapabilitiesTool,
    /// Config file in effect, if any.
    pub config_path: Option<String>,
    pub dataset: Option<CapabilitiesDataset>,
    pub predictor: CapabilitiesPredictor,
    pub report_formats: Vec<String>,
    pub commands: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub status: ResponseStatus,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON Schema of the `check` output document.
pub fn check_output_schema() -> Result<String> {
    serialize_json_pretty(&schemars::schema_for!(CheckOutput))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_envelope_shape() {
        let envelope = ErrorEnvelope::new("dataset_error", "missing column").with_hint("check");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "dataset_error");
        assert_eq!(value["hint"], "check");
        assert!(value["details"].is_null());
    }

    #[test]
    fn predictions_are_omitted_unless_requested() {
        let out = CheckOutput {
            schema_version: CHECK_SCHEMA_VERSION,
            status: ResponseStatus::Ok,
            symptoms: Vec::new(),
            conditions: Vec::new(),
            breakdown: Vec::new(),
            suggestions: vec!["fever".to_string()],
            predictions: None,
        };
        let raw = serialize_json(&out).unwrap();
        assert!(!raw.contains("predictions"));
        let back: CheckOutput = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, out);
    }

    #[test]
    fn check_schema_names_top_level_fields() {
        let schema: serde_json::Value =
            serde_json::from_str(&check_output_schema().unwrap()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["symptoms", "conditions", "breakdown", "suggestions"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }
}
