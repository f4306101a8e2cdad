//! Vocabulary backed by a HuggingFace `tokenizer.json`.

use std::path::Path;

use tokenizers::Tokenizer;

use crate::text::Vocabulary;
use crate::EmotionError;

/// Wraps a `tokenizers::Tokenizer`. Special tokens are never added; padding
/// and truncation are left to [`PaddingConfig`](crate::text::PaddingConfig).
pub struct HfVocabulary {
    tokenizer: Tokenizer,
}

impl HfVocabulary {
    pub fn from_file(path: &Path) -> Result<Self, EmotionError> {
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| EmotionError::artifact(path, e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| EmotionError::artifact(path, e))?;
        Ok(Self { tokenizer })
    }
}

impl Vocabulary for HfVocabulary {
    fn encode(&self, text: &str) -> Result<Vec<u32>, EmotionError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| EmotionError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}
