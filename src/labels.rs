//! Label codec: the only holder of the class index ↔ emotion name mapping.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EmotionError;

/// Bidirectional mapping between class indices and emotion labels.
///
/// Index order is the training-time class order (an sklearn
/// `LabelEncoder.classes_` array).
#[derive(Debug, Clone)]
pub struct LabelCodec {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct LabelDocument {
    classes: Vec<String>,
}

impl LabelCodec {
    /// Build a codec; the class list must be non-empty and duplicate-free.
    pub fn new(classes: Vec<String>) -> Result<Self, EmotionError> {
        if classes.is_empty() {
            return Err(EmotionError::Config("label set is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (i, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), i).is_some() {
                return Err(EmotionError::Config(format!(
                    "duplicate label '{}' in label set",
                    class
                )));
            }
        }

        Ok(Self { classes, index })
    }

    /// Parse a `{"classes": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, EmotionError> {
        let doc: LabelDocument = serde_json::from_str(json)?;
        Self::new(doc.classes)
    }

    pub fn from_file(path: &Path) -> Result<Self, EmotionError> {
        let json =
            std::fs::read_to_string(path).map_err(|e| EmotionError::artifact(path, e))?;
        let codec = Self::from_json(&json).map_err(|e| EmotionError::artifact(path, e))?;
        tracing::info!(
            "Label codec loaded from {} ({} labels)",
            path.display(),
            codec.len()
        );
        Ok(codec)
    }

    pub fn to_json(&self) -> Result<String, EmotionError> {
        let doc = LabelDocument {
            classes: self.classes.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn encode(&self, label: &str) -> Result<usize, EmotionError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| EmotionError::UnknownLabel(label.to_string()))
    }

    pub fn decode(&self, index: usize) -> Result<&str, EmotionError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(EmotionError::LabelIndexOutOfRange {
                index,
                num_labels: self.classes.len(),
            })
    }

    /// Decode a batch of indices, preserving order.
    pub fn decode_many(&self, indices: &[usize]) -> Result<Vec<String>, EmotionError> {
        indices
            .iter()
            .map(|&i| self.decode(i).map(str::to_string))
            .collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
