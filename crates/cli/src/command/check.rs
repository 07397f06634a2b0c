use anyhow::{anyhow, Context, Result};
use symptom_dataset::ReferenceTable;
use symptom_predictor::{ConditionPredictor, Prediction, SymptomPrediction};
use symptom_protocol::{
    BreakdownEntry, CheckOutput, ConditionCard, PredictionCard, ResponseStatus, SymptomBreakdown,
    SymptomCard, CHECK_SCHEMA_VERSION,
};
use symptom_search::{combine, find_matches, suggest};

use crate::config::DisplayConfig;
use crate::report::body_region;

use super::INVALID_INPUT;

/// Gather symptoms from every input channel: comma-separated free text first, then
/// `--symptom` values, then quick picks. Blank pieces are dropped.
pub(crate) fn collect_symptoms(
    free_text: &[String],
    flagged: &[String],
    quick: &[String],
    display: &DisplayConfig,
) -> Result<Vec<String>> {
    let mut symptoms: Vec<String> = free_text
        .iter()
        .flat_map(|text| text.split(','))
        .chain(flagged.iter().map(String::as_str))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect();

    for name in quick {
        let pick = display
            .quick_picks
            .iter()
            .find(|pick| pick.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                anyhow!(
                    "unknown quick pick '{name}' (available: {})",
                    display.quick_picks.join(", ")
                )
            })
            .context(INVALID_INPUT)?;
        symptoms.push(pick.clone());
    }
    Ok(symptoms)
}

pub(crate) fn build_check_output(
    table: &ReferenceTable,
    symptoms: &[String],
    display: &DisplayConfig,
) -> CheckOutput {
    let matches = find_matches(symptoms, table);
    let combined = combine(&matches);
    log::debug!(
        "{} symptom(s) produced {} candidate condition(s)",
        matches.len(),
        combined.len()
    );

    let symptom_cards = matches
        .iter()
        .map(|entry| SymptomCard {
            symptom: entry.symptom.clone(),
            body_region: body_region(&entry.symptom).to_string(),
        })
        .collect();

    let conditions = combined
        .iter()
        .map(|condition| ConditionCard {
            condition: condition.condition.clone(),
            severity: condition.severity.to_string(),
            severity_weight: condition.severity.weight(),
            confidence: condition.confidence().to_string(),
            match_count: condition.match_count,
            matched_symptoms: matches
                .symptoms_for(&condition.condition)
                .into_iter()
                .map(String::from)
                .collect(),
        })
        .collect();

    let breakdown = matches
        .iter()
        .map(|entry| SymptomBreakdown {
            symptom: entry.symptom.clone(),
            conditions: entry
                .matches
                .iter()
                .take(display.breakdown_limit)
                .map(|m| BreakdownEntry {
                    condition: m.condition.clone(),
                    severity: m.severity.to_string(),
                })
                .collect(),
            more: entry.matches.len().saturating_sub(display.breakdown_limit),
        })
        .collect();

    let suggestions = if combined.is_empty() {
        suggest(symptoms, &table.vocabulary(), display.max_suggestions)
    } else {
        Vec::new()
    };

    CheckOutput {
        schema_version: CHECK_SCHEMA_VERSION,
        status: ResponseStatus::Ok,
        symptoms: symptom_cards,
        conditions,
        breakdown,
        suggestions,
        predictions: None,
    }
}

/// Per-symptom and combined predictions, or a single sentinel when no model is loaded.
pub(crate) fn prediction_cards(
    predictor: &impl ConditionPredictor,
    symptoms: &[String],
) -> Vec<PredictionCard> {
    if !predictor.is_available() {
        return vec![card(None, Prediction::unavailable())];
    }
    predictor
        .predict_many(symptoms)
        .into_iter()
        .map(|SymptomPrediction { symptom, prediction }| card(Some(symptom), prediction))
        .collect()
}

pub(crate) fn card(symptom: Option<String>, prediction: Prediction) -> PredictionCard {
    PredictionCard {
        symptom,
        status: prediction.status.as_str().to_string(),
        label: prediction.label,
        confidence: prediction.confidence,
    }
}
