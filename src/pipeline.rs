//! Text → label inference: tokenize, pad, score, arg-max, decode.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::labels::LabelCodec;
use crate::model::ScoreModel;
use crate::text::{PaddingConfig, Vocabulary};
use crate::EmotionError;

/// One scored prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    /// Score of the winning class.
    pub confidence: f32,
    /// Every class score, in label-index order.
    pub scores: Vec<f32>,
}

/// Index of the first maximal score; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Orchestrates vocabulary, padding, model and label codec.
///
/// All collaborators are injected and shared read-only; nothing is mutated
/// after construction.
#[derive(Clone)]
pub struct InferencePipeline {
    vocabulary: Arc<dyn Vocabulary>,
    model: Arc<dyn ScoreModel>,
    labels: Arc<LabelCodec>,
    padding: PaddingConfig,
}

impl InferencePipeline {
    /// Wire the pipeline, checking the pieces agree with each other.
    pub fn new(
        vocabulary: Arc<dyn Vocabulary>,
        model: Arc<dyn ScoreModel>,
        labels: Arc<LabelCodec>,
        padding: PaddingConfig,
    ) -> Result<Self, EmotionError> {
        if model.num_labels() != labels.len() {
            return Err(EmotionError::Config(format!(
                "model scores {} labels but the label codec has {}",
                model.num_labels(),
                labels.len()
            )));
        }
        if padding.maxlen == 0 || padding.maxlen > model.maxlen() {
            return Err(EmotionError::Config(format!(
                "padding maxlen {} must be between 1 and the model maxlen {}",
                padding.maxlen,
                model.maxlen()
            )));
        }
        Ok(Self {
            vocabulary,
            model,
            labels,
            padding,
        })
    }

    /// Classify one text. Empty text is rejected without touching the model.
    pub fn predict_one(&self, text: &str) -> Result<String, EmotionError> {
        Ok(self.predict_one_scored(text)?.label)
    }

    /// Classify one text, keeping the score vector.
    pub fn predict_one_scored(&self, text: &str) -> Result<Prediction, EmotionError> {
        if text.trim().is_empty() {
            return Err(EmotionError::EmptyInput);
        }

        let ids = self.vocabulary.encode(text)?;
        let batch = self.padding.pad_batch(&[ids]);
        let scores = self.score(&batch, 1)?.into_iter().next().ok_or_else(|| {
            EmotionError::Inference("model returned no rows for a single input".to_string())
        })?;

        let index = self.best_index(&scores)?;
        Ok(Prediction {
            label: self.labels.decode(index)?.to_string(),
            confidence: scores[index],
            scores,
        })
    }

    /// Classify many texts with one model call; output order matches input.
    pub fn predict_batch<S: AsRef<str>>(&self, rows: &[S]) -> Result<Vec<String>, EmotionError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let sequences = rows
            .iter()
            .map(|text| self.vocabulary.encode(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let batch = self.padding.pad_batch(&sequences);
        debug!("Predicting batch of {} rows", batch.rows());

        let scores = self.score(&batch, rows.len())?;
        let indices = scores
            .iter()
            .map(|row| self.best_index(row))
            .collect::<Result<Vec<_>, _>>()?;
        self.labels.decode_many(&indices)
    }

    pub fn labels(&self) -> &LabelCodec {
        &self.labels
    }

    pub fn padding(&self) -> PaddingConfig {
        self.padding
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.vocab_size()
    }

    fn score(
        &self,
        batch: &crate::text::PaddedBatch,
        expected_rows: usize,
    ) -> Result<Vec<Vec<f32>>, EmotionError> {
        let scores = self.model.predict(batch)?;
        if scores.len() != expected_rows {
            return Err(EmotionError::Inference(format!(
                "model returned {} rows for {} inputs",
                scores.len(),
                expected_rows
            )));
        }
        if let Some(row) = scores.iter().find(|row| row.len() != self.labels.len()) {
            return Err(EmotionError::Inference(format!(
                "model returned {} scores, expected {}",
                row.len(),
                self.labels.len()
            )));
        }
        Ok(scores)
    }

    fn best_index(&self, scores: &[f32]) -> Result<usize, EmotionError> {
        argmax(scores).ok_or_else(|| {
            EmotionError::Inference("score vector has no comparable values".to_string())
        })
    }
}
