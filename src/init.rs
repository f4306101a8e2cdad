//! Shared startup: data path, configuration, artifacts, and the pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::artifacts::{resolve_artifacts, ArtifactFiles};
use crate::config::{load_config, ClassifierConfig};
use crate::labels::LabelCodec;
use crate::model::{select_device, LayerRegistry, ScoreModel, SequenceClassifier};
use crate::pipeline::InferencePipeline;
use crate::text::{load_vocabulary, Vocabulary};
use crate::EmotionError;

pub const DATA_PATH_ENV_VAR: &str = "REVIEW_EMOTION_DATA_PATH";
const DATA_DIR_NAME: &str = ".review-emotion";

/// Data path priority: explicit path > REVIEW_EMOTION_DATA_PATH env >
/// ./.review-emotion (if exists) > ~/.review-emotion
pub fn resolve_data_path(explicit_path: Option<PathBuf>) -> PathBuf {
    explicit_path
        .or_else(|| std::env::var(DATA_PATH_ENV_VAR).ok().map(PathBuf::from))
        .or_else(|| {
            let local_path = Path::new(DATA_DIR_NAME);
            if local_path.is_dir() {
                Some(local_path.to_path_buf())
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(DATA_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
        })
}

/// Everything a command needs, loaded once and shared read-only.
pub struct AppContext {
    pub data_path: PathBuf,
    pub config: ClassifierConfig,
    pub files: ArtifactFiles,
    pub model: Arc<SequenceClassifier>,
    pub labels: Arc<LabelCodec>,
    pub pipeline: InferencePipeline,
}

impl AppContext {
    /// Load configuration and every artifact. Any failure is fatal.
    pub fn new(explicit_path: Option<PathBuf>) -> Result<Self, EmotionError> {
        let data_path = resolve_data_path(explicit_path);
        tracing::info!("Using data path: {}", data_path.display());

        let config = load_config(&data_path)?;
        Self::from_config(data_path, config)
    }

    /// Build from an already loaded configuration.
    pub fn from_config(data_path: PathBuf, config: ClassifierConfig) -> Result<Self, EmotionError> {
        let files = resolve_artifacts(&config.artifacts, &data_path)?;

        let registry = LayerRegistry::with_custom_layers();
        let device = select_device();
        let model = Arc::new(SequenceClassifier::load(
            &files.manifest,
            &files.weights,
            &registry,
            device,
        )?);

        let vocabulary: Arc<dyn Vocabulary> =
            Arc::from(load_vocabulary(&files.vocabulary, config.vocabulary.format)?);
        if let Some(model_vocab) = model.vocab_size() {
            if vocabulary.vocab_size() > model_vocab {
                tracing::warn!(
                    "Vocabulary has {} ids but the model embeds only {}; out-of-range ids will fail",
                    vocabulary.vocab_size(),
                    model_vocab
                );
            }
        }

        let labels = Arc::new(LabelCodec::from_file(&files.labels)?);
        if labels.len() != model.num_labels() {
            return Err(EmotionError::artifact(
                &files.labels,
                format!(
                    "{} classes but the model scores {}",
                    labels.len(),
                    model.num_labels()
                ),
            ));
        }

        let pipeline = InferencePipeline::new(
            vocabulary,
            model.clone(),
            labels.clone(),
            config.sequence,
        )?;
        tracing::info!("Classifier ready ({} labels)", labels.len());

        Ok(Self {
            data_path,
            config,
            files,
            model,
            labels,
            pipeline,
        })
    }
}
