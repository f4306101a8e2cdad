//! Word-index vocabulary in the format written by Keras `Tokenizer.to_json()`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::text::Vocabulary;
use crate::EmotionError;

/// Default Keras filter set: punctuation plus tab and newline.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Word-level vocabulary with Keras `texts_to_sequences` semantics.
///
/// Text is lower-cased (if configured), every filter character is replaced
/// by the split string, and the result is split with empty pieces dropped.
/// Words found in the index map to their id; words whose id is at or above
/// `num_words` and words missing from the index map to the OOV id when an
/// OOV token is configured, and are dropped otherwise.
#[derive(Debug, Clone)]
pub struct WordIndexVocabulary {
    word_index: HashMap<String, u32>,
    num_words: Option<usize>,
    filters: String,
    lower: bool,
    split: String,
    char_level: bool,
    oov_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenizerDocument {
    #[serde(default)]
    class_name: Option<String>,
    config: TokenizerConfig,
}

#[derive(Deserialize)]
struct TokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_true")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: WordIndexField,
}

/// Keras stores `word_index` as a JSON-encoded string inside the config;
/// hand-written artifacts often inline the object instead.
#[derive(Deserialize)]
#[serde(untagged)]
enum WordIndexField {
    Encoded(String),
    Inline(HashMap<String, u32>),
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_true() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

impl WordIndexVocabulary {
    /// Build a vocabulary from an index using Keras defaults for everything else.
    pub fn new(word_index: HashMap<String, u32>) -> Self {
        Self {
            word_index,
            num_words: None,
            filters: default_filters(),
            lower: true,
            split: default_split(),
            char_level: false,
            oov_token: None,
        }
    }

    pub fn with_oov_token(mut self, token: impl Into<String>) -> Self {
        self.oov_token = Some(token.into());
        self
    }

    pub fn with_num_words(mut self, num_words: usize) -> Self {
        self.num_words = Some(num_words);
        self
    }

    /// Parse a Keras tokenizer JSON document.
    pub fn from_json(json: &str) -> Result<Self, EmotionError> {
        let doc: TokenizerDocument = serde_json::from_str(json)?;
        if let Some(class_name) = doc.class_name.as_deref() {
            if class_name != "Tokenizer" {
                return Err(EmotionError::Config(format!(
                    "expected a Keras 'Tokenizer' document, found '{}'",
                    class_name
                )));
            }
        }

        let config = doc.config;
        let word_index = match config.word_index {
            WordIndexField::Encoded(encoded) => serde_json::from_str(&encoded)?,
            WordIndexField::Inline(map) => map,
        };

        Ok(Self {
            word_index,
            num_words: config.num_words,
            filters: config.filters,
            lower: config.lower,
            split: config.split,
            char_level: config.char_level,
            oov_token: config.oov_token,
        })
    }

    /// Load a Keras tokenizer JSON file.
    pub fn from_file(path: &Path) -> Result<Self, EmotionError> {
        let json =
            std::fs::read_to_string(path).map_err(|e| EmotionError::artifact(path, e))?;
        Self::from_json(&json).map_err(|e| EmotionError::artifact(path, e))
    }

    /// Split text into the word pieces Keras would look up.
    fn words(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.char_level {
            return text.chars().map(String::from).collect();
        }

        let translated: String = text
            .chars()
            .map(|c| {
                if self.filters.contains(c) {
                    self.split.clone()
                } else {
                    c.to_string()
                }
            })
            .collect();

        translated
            .split(self.split.as_str())
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect()
    }

    fn oov_id(&self) -> Option<u32> {
        self.oov_token
            .as_ref()
            .and_then(|token| self.word_index.get(token).copied())
    }
}

impl Vocabulary for WordIndexVocabulary {
    fn encode(&self, text: &str) -> Result<Vec<u32>, EmotionError> {
        let oov = self.oov_id();
        let mut ids = Vec::new();

        for word in self.words(text) {
            match self.word_index.get(&word) {
                Some(&id) => {
                    let beyond_limit = self.num_words.is_some_and(|n| id as usize >= n);
                    if !beyond_limit {
                        ids.push(id);
                    } else if let Some(oov) = oov {
                        ids.push(oov);
                    }
                }
                None => {
                    if let Some(oov) = oov {
                        ids.push(oov);
                    }
                }
            }
        }

        Ok(ids)
    }

    fn vocab_size(&self) -> usize {
        self.num_words.unwrap_or(self.word_index.len() + 1)
    }
}
