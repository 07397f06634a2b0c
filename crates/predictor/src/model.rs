use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use symptom_dataset::ReferenceTable;

use crate::error::{PredictorError, Result};
use crate::features::terms;

pub const MODEL_FILE_NAME: &str = "symptom_model.json";
pub const MODEL_SCHEMA_VERSION: u32 = 1;
pub const MODEL_TYPE: &str = "MultinomialNB";

#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    /// Additive smoothing for the naive Bayes feature likelihoods.
    pub alpha: f64,
    /// Vocabulary cap; the most frequent terms are kept.
    pub max_features: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            max_features: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub text: String,
    pub label: String,
}

/// One example per row, plus one per unordered pair of symptoms sharing a condition.
#[must_use]
pub fn training_examples(table: &ReferenceTable) -> Vec<TrainingExample> {
    let mut examples: Vec<TrainingExample> = table
        .rows()
        .iter()
        .map(|row| TrainingExample {
            text: row.symptom.clone(),
            label: row.condition.clone(),
        })
        .collect();

    for condition in table.conditions() {
        let symptoms: Vec<&str> = table
            .rows()
            .iter()
            .filter(|row| row.condition == condition)
            .map(|row| row.symptom.as_str())
            .collect();
        for (i, first) in symptoms.iter().enumerate() {
            for second in &symptoms[i + 1..] {
                examples.push(TrainingExample {
                    text: format!("{first} {second}"),
                    label: condition.to_string(),
                });
            }
        }
    }
    examples
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
    pub description: String,
    pub dataset_fingerprint: String,
    pub training_examples: usize,
    pub features_count: usize,
    pub classes_count: usize,
}

/// TF-IDF features (unigrams + bigrams, smooth IDF, L2-normalized) fed to a multinomial
/// naive Bayes classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    schema_version: u32,
    metadata: ModelMetadata,
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]`
    feature_log_prob: Vec<Vec<f64>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl NaiveBayesModel {
    pub fn train(table: &ReferenceTable, options: TrainOptions) -> Result<Self> {
        let examples = training_examples(table);
        if examples.is_empty() {
            return Err(PredictorError::EmptyTrainingSet);
        }
        let docs: Vec<Vec<String>> = examples.iter().map(|e| terms(&e.text)).collect();

        let vocabulary = select_vocabulary(&docs, options.max_features);
        if vocabulary.is_empty() {
            return Err(PredictorError::EmptyVocabulary);
        }
        let index = build_index(&vocabulary);

        let n_docs = docs.len() as f64;
        let mut doc_freq = vec![0usize; vocabulary.len()];
        for doc in &docs {
            let present: BTreeSet<usize> = doc.iter().filter_map(|t| index.get(t).copied()).collect();
            for feature in present {
                doc_freq[feature] += 1;
            }
        }
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let classes: Vec<String> = examples
            .iter()
            .map(|e| e.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; vocabulary.len()]; classes.len()];
        for (example, doc) in examples.iter().zip(&docs) {
            let class = class_index[example.label.as_str()];
            class_count[class] += 1;
            for (feature, weight) in tfidf(doc, &index, &idf) {
                feature_count[class][feature] += weight;
            }
        }

        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / n_docs).ln())
            .collect();
        let smoothing = options.alpha * vocabulary.len() as f64;
        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + smoothing;
                counts
                    .iter()
                    .map(|&c| ((c + options.alpha) / total).ln())
                    .collect()
            })
            .collect();

        log::info!(
            "Trained {MODEL_TYPE} on {} examples: {} features, {} classes",
            examples.len(),
            vocabulary.len(),
            classes.len()
        );

        Ok(Self {
            schema_version: MODEL_SCHEMA_VERSION,
            metadata: ModelMetadata {
                model_type: MODEL_TYPE.to_string(),
                created_at: SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default(),
                description: "Lightweight symptom-to-condition predictor".to_string(),
                dataset_fingerprint: table.fingerprint(),
                training_examples: examples.len(),
                features_count: vocabulary.len(),
                classes_count: classes.len(),
            },
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
            index,
        })
    }

    #[must_use]
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn features_count(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class probabilities for `text`, sorted by probability descending (ties by class name).
    pub fn predict_proba(&self, text: &str) -> Result<Vec<(String, f64)>> {
        let doc = terms(text);
        let features = tfidf(&doc, &self.index, &self.idf);

        let joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + features
                        .iter()
                        .map(|&(feature, weight)| weight * log_probs[feature])
                        .sum::<f64>()
            })
            .collect();

        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(PredictorError::Numerical(format!(
                "non-finite class likelihood for '{text}'"
            )));
        }
        let exp: Vec<f64> = joint.iter().map(|j| (j - max).exp()).collect();
        let total: f64 = exp.iter().sum();

        let mut ranked: Vec<(String, f64)> = self
            .classes
            .iter()
            .cloned()
            .zip(exp.into_iter().map(|e| e / total))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(MODEL_FILE_NAME);
        log::info!("Saving predictor model to {}", path.display());
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(path)
    }

    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(MODEL_FILE_NAME);
        if !path.is_file() {
            return Err(PredictorError::NotFound(path));
        }
        log::info!("Loading predictor model from {}", path.display());
        let data = fs::read_to_string(&path)?;
        let mut model: Self = serde_json::from_str(&data)?;
        model.validate()?;
        model.index = build_index(&model.vocabulary);
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PredictorError::InvalidModel(msg));
        if self.schema_version != MODEL_SCHEMA_VERSION {
            return invalid(format!(
                "schema_version {} is not supported (expected {MODEL_SCHEMA_VERSION})",
                self.schema_version
            ));
        }
        if self.classes.is_empty() {
            return invalid("no classes".to_string());
        }
        if self.idf.len() != self.vocabulary.len() {
            return invalid(format!(
                "idf has {} entries for {} features",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        if self.class_log_prior.len() != self.classes.len()
            || self.feature_log_prob.len() != self.classes.len()
        {
            return invalid("class tables disagree with class count".to_string());
        }
        if self.metadata.features_count != self.vocabulary.len()
            || self.metadata.classes_count != self.classes.len()
        {
            return invalid(format!(
                "metadata declares {} features and {} classes, found {} and {}",
                self.metadata.features_count,
                self.metadata.classes_count,
                self.vocabulary.len(),
                self.classes.len()
            ));
        }
        if let Some(row) = self
            .feature_log_prob
            .iter()
            .position(|row| row.len() != self.vocabulary.len())
        {
            return invalid(format!("feature_log_prob[{row}] has the wrong width"));
        }
        Ok(())
    }
}

/// Most frequent terms (ties alphabetical), returned in alphabetical order.
fn select_vocabulary(docs: &[Vec<String>], max_features: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for term in docs.iter().flatten() {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
    vocabulary.sort_unstable();
    vocabulary
}

fn build_index(vocabulary: &[String]) -> HashMap<String, usize> {
    vocabulary
        .iter()
        .enumerate()
        .map(|(i, term)| (term.clone(), i))
        .collect()
}

/// Sparse L2-normalized TF-IDF vector; unknown terms are ignored.
fn tfidf(doc: &[String], index: &HashMap<String, usize>, idf: &[f64]) -> Vec<(usize, f64)> {
    let mut tf: HashMap<usize, f64> = HashMap::new();
    for term in doc {
        if let Some(&feature) = index.get(term) {
            *tf.entry(feature).or_insert(0.0) += 1.0;
        }
    }
    let mut weights: Vec<(usize, f64)> = tf
        .into_iter()
        .map(|(feature, count)| (feature, count * idf[feature]))
        .collect();
    weights.sort_by_key(|(feature, _)| *feature);

    let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut weights {
            *w /= norm;
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use symptom_dataset::{ReferenceRow, Severity};

    fn table() -> ReferenceTable {
        ReferenceTable::from_rows(vec![
            ReferenceRow::new("fever", "Flu", Severity::Medium),
            ReferenceRow::new("body aches", "Flu", Severity::Medium),
            ReferenceRow::new("chills", "Flu", Severity::Medium),
            ReferenceRow::new("sneezing", "Common Cold", Severity::Low),
            ReferenceRow::new("runny nose", "Common Cold", Severity::Low),
            ReferenceRow::new("chest pain", "Heart Attack", Severity::Critical),
            ReferenceRow::new("arm pain", "Heart Attack", Severity::Critical),
        ])
    }

    #[test]
    fn pairs_symptoms_within_a_condition() {
        let examples = training_examples(&table());
        // 7 rows + Flu: 3 pairs, Common Cold: 1, Heart Attack: 1
        assert_eq!(examples.len(), 12);
        assert!(examples.contains(&TrainingExample {
            text: "fever chills".to_string(),
            label: "Flu".to_string(),
        }));
    }

    #[test]
    fn predicts_the_condition_of_a_known_symptom() {
        let model = NaiveBayesModel::train(&table(), TrainOptions::default()).unwrap();
        let ranked = model.predict_proba("runny nose").unwrap();
        assert_eq!(ranked[0].0, "Common Cold");
        assert!(ranked[0].1 > ranked[1].1);

        let total: f64 = ranked.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn classes_are_sorted_and_vocabulary_capped() {
        let options = TrainOptions {
            max_features: 3,
            ..TrainOptions::default()
        };
        let model = NaiveBayesModel::train(&table(), options).unwrap();
        assert_eq!(model.classes(), &["Common Cold", "Flu", "Heart Attack"]);
        assert_eq!(model.features_count(), 3);
    }

    #[test]
    fn unknown_text_falls_back_to_priors() {
        let model = NaiveBayesModel::train(&table(), TrainOptions::default()).unwrap();
        let ranked = model.predict_proba("zzz qqq").unwrap();
        // Flu has the most training examples.
        assert_eq!(ranked[0].0, "Flu");
    }

    #[test]
    fn empty_table_cannot_train() {
        let err = NaiveBayesModel::train(&ReferenceTable::default(), TrainOptions::default())
            .unwrap_err();
        assert!(matches!(err, PredictorError::EmptyTrainingSet));
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let model = NaiveBayesModel::train(&table(), TrainOptions::default()).unwrap();
        let path = model.save(dir.path()).unwrap();
        assert!(path.ends_with(MODEL_FILE_NAME));

        let loaded = NaiveBayesModel::load(dir.path()).unwrap();
        assert_eq!(loaded.metadata(), model.metadata());
        assert_eq!(loaded.metadata().features_count, loaded.features_count());
        assert_eq!(loaded.metadata().classes_count, 3);
        assert_eq!(
            loaded.predict_proba("chest pain").unwrap()[0].0,
            "Heart Attack"
        );
    }

    #[test]
    fn rejects_inconsistent_model_files() {
        let dir = tempfile::tempdir().unwrap();
        let model = NaiveBayesModel::train(&table(), TrainOptions::default()).unwrap();
        let mut value = serde_json::to_value(&model).unwrap();
        value["idf"] = serde_json::json!([1.0]);
        fs::write(dir.path().join(MODEL_FILE_NAME), value.to_string()).unwrap();

        let err = NaiveBayesModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidModel(_)));
    }

    #[test]
    fn rejects_metadata_that_disagrees_with_the_tables() {
        let dir = tempfile::tempdir().unwrap();
        let model = NaiveBayesModel::train(&table(), TrainOptions::default()).unwrap();
        let mut value = serde_json::to_value(&model).unwrap();
        value["metadata"]["classes_count"] = serde_json::json!(7);
        fs::write(dir.path().join(MODEL_FILE_NAME), value.to_string()).unwrap();

        let err = NaiveBayesModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidModel(_)));
    }

    #[test]
    fn missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = NaiveBayesModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, PredictorError::NotFound(_)));
    }
}
