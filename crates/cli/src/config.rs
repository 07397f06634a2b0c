use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SYMPTOM_CHECKER_CONFIG";
pub const DATASET_ENV: &str = "SYMPTOM_CHECKER_DATASET";
pub const MODEL_DIR_ENV: &str = "SYMPTOM_CHECKER_MODEL_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "symptom-checker.toml";

/// Top-level context for every configuration failure; error classification keys on it.
pub const INVALID_CONFIG: &str = "Invalid configuration";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("symptoms.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    pub model_dir: PathBuf,
    pub top_k: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub max_suggestions: usize,
    pub breakdown_limit: usize,
    pub vocabulary_preview: usize,
    pub stats_top: usize,
    pub quick_picks: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 6,
            breakdown_limit: 5,
            vocabulary_preview: 20,
            stats_top: 8,
            quick_picks: [
                "fever",
                "headache",
                "cough",
                "sore throat",
                "fatigue",
                "nausea",
                "chest pain",
                "dizziness",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub predictor: PredictorConfig,
    pub display: DisplayConfig,
}

/// Command-line values that win over the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub model_dir: Option<PathBuf>,
}

/// A resolved configuration and the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("{} is not valid", path.display()))
    }

    /// Resolve defaults < file < environment < command line.
    pub fn load(overrides: &Overrides) -> Result<LoadedConfig> {
        Self::load_with(overrides, |key| std::env::var(key).ok())
    }

    pub fn load_with(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig> {
        let source = config_path(overrides.config.as_deref(), &env);
        let mut config = match &source {
            Some(path) => Self::from_file(path).context(INVALID_CONFIG)?,
            None => Self::default(),
        };

        if let Some(path) = env(DATASET_ENV).filter(|v| !v.trim().is_empty()) {
            config.dataset.path = PathBuf::from(path);
        }
        if let Some(dir) = env(MODEL_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.predictor.model_dir = PathBuf::from(dir);
        }
        if let Some(path) = &overrides.dataset {
            config.dataset.path.clone_from(path);
        }
        if let Some(dir) = &overrides.model_dir {
            config.predictor.model_dir.clone_from(dir);
        }

        if let Some(path) = &source {
            log::debug!("Loaded configuration from {}", path.display());
        }
        Ok(LoadedConfig { config, source })
    }

    fn validate(&self) -> Result<()> {
        validate_positive("predictor.top_k", self.predictor.top_k)?;
        validate_positive("display.max_suggestions", self.display.max_suggestions)?;
        validate_positive("display.breakdown_limit", self.display.breakdown_limit)?;
        validate_positive("display.vocabulary_preview", self.display.vocabulary_preview)?;
        validate_positive("display.stats_top", self.display.stats_top)?;

        for (idx, pick) in self.display.quick_picks.iter().enumerate() {
            if pick.trim().is_empty() {
                return Err(anyhow!("display.quick_picks[{idx}] must not be empty"));
            }
        }
        if self.dataset.path.as_os_str().is_empty() {
            return Err(anyhow!("dataset.path must not be empty"));
        }
        Ok(())
    }
}

fn validate_positive(path: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(anyhow!("{path} must be greater than zero"));
    }
    Ok(())
}

fn config_path(explicit: Option<&Path>, env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env(CONFIG_ENV).filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}
