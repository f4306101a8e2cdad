//! Classifier configuration.
//!
//! Loaded from `{data_path}/classifier.toml`, else the
//! `REVIEW_EMOTION_CONFIG` env var (JSON), else defaults. Every field has a
//! default, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::text::{PaddingConfig, VocabularyFormat};
use crate::EmotionError;

pub const CONFIG_FILE_NAME: &str = "classifier.toml";
pub const CONFIG_ENV_VAR: &str = "REVIEW_EMOTION_CONFIG";

/// File names of the four artifacts inside the artifact directory or hub repo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactFileNames {
    pub manifest: String,
    pub weights: String,
    pub vocabulary: String,
    pub labels: String,
}

impl Default for ArtifactFileNames {
    fn default() -> Self {
        Self {
            manifest: "model.json".to_string(),
            weights: "model.safetensors".to_string(),
            vocabulary: "tokenizer.json".to_string(),
            labels: "labels.json".to_string(),
        }
    }
}

/// Where the trained artifacts come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArtifactSource {
    /// A local directory (default: the data path itself).
    Local {
        #[serde(default)]
        dir: Option<PathBuf>,
        #[serde(default)]
        files: ArtifactFileNames,
    },
    /// A HuggingFace Hub model repo, downloaded into the hub cache.
    Hub {
        repo: String,
        #[serde(default)]
        revision: Option<String>,
        #[serde(default)]
        cache_dir: Option<PathBuf>,
        #[serde(default)]
        files: ArtifactFileNames,
    },
}

impl Default for ArtifactSource {
    fn default() -> Self {
        Self::Local {
            dir: None,
            files: ArtifactFileNames::default(),
        }
    }
}

impl ArtifactSource {
    pub fn files(&self) -> &ArtifactFileNames {
        match self {
            ArtifactSource::Local { files, .. } | ArtifactSource::Hub { files, .. } => files,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularySettings {
    pub format: VocabularyFormat,
}

/// Column names used by the bulk workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub text_column: String,
    pub prediction_column: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            text_column: "Review".to_string(),
            prediction_column: "Emotion Prediction".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub artifacts: ArtifactSource,
    pub sequence: PaddingConfig,
    pub vocabulary: VocabularySettings,
    pub table: TableSettings,
}

impl ClassifierConfig {
    pub fn from_toml(contents: &str) -> Result<Self, EmotionError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| EmotionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, EmotionError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EmotionError> {
        if self.sequence.maxlen == 0 {
            return Err(EmotionError::Config("sequence.maxlen must be positive".to_string()));
        }
        if self.table.text_column.is_empty() || self.table.prediction_column.is_empty() {
            return Err(EmotionError::Config("table column names must not be empty".to_string()));
        }
        if self.table.text_column == self.table.prediction_column {
            return Err(EmotionError::Config(format!(
                "text and prediction columns are both '{}'",
                self.table.text_column
            )));
        }
        if let ArtifactSource::Hub { repo, .. } = &self.artifacts {
            if repo.trim().is_empty() {
                return Err(EmotionError::Config("artifacts.repo must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

/// Load configuration with priority:
/// 1. `{data_path}/classifier.toml`
/// 2. `REVIEW_EMOTION_CONFIG` env var (JSON)
/// 3. Defaults
pub fn load_config(data_path: &Path) -> Result<ClassifierConfig, EmotionError> {
    load_config_with_env(data_path, std::env::var(CONFIG_ENV_VAR).ok())
}

/// [`load_config`] with the env var value passed in.
pub fn load_config_with_env(
    data_path: &Path,
    env_json: Option<String>,
) -> Result<ClassifierConfig, EmotionError> {
    let config_path = data_path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| EmotionError::artifact(&config_path, e))?;
        let config = ClassifierConfig::from_toml(&contents)
            .map_err(|e| EmotionError::artifact(&config_path, e))?;
        info!("Loaded classifier config from {}", config_path.display());
        return Ok(config);
    }

    if let Some(json) = env_json {
        let config = ClassifierConfig::from_json(&json)
            .map_err(|e| EmotionError::Config(format!("{}: {}", CONFIG_ENV_VAR, e)))?;
        info!("Loaded classifier config from {} env", CONFIG_ENV_VAR);
        return Ok(config);
    }

    Ok(ClassifierConfig::default())
}
