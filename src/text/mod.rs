//! Text preprocessing: vocabularies and fixed-length padding.
//!
//! The [`Vocabulary`] trait abstracts how text becomes token ids so the
//! inference pipeline works with either artifact format (or a fake in tests).

pub mod hf;
pub mod padding;
pub mod word_index;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EmotionError;

pub use hf::HfVocabulary;
pub use padding::{PaddedBatch, PaddingConfig, Side, DEFAULT_MAXLEN, PAD_ID};
pub use word_index::WordIndexVocabulary;

/// Maps raw text to token ids.
///
/// Unknown-token handling is the vocabulary's own policy; callers never
/// post-process the returned ids beyond padding.
pub trait Vocabulary: Send + Sync {
    /// Encode one text into unpadded token ids.
    fn encode(&self, text: &str) -> Result<Vec<u32>, EmotionError>;

    /// Number of ids the vocabulary can produce, padding included.
    fn vocab_size(&self) -> usize;
}

/// On-disk vocabulary artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyFormat {
    /// Keras `Tokenizer.to_json()` document.
    #[default]
    WordIndex,
    /// HuggingFace `tokenizer.json`.
    Huggingface,
}

/// Load a vocabulary artifact in the given format.
pub fn load_vocabulary(
    path: &Path,
    format: VocabularyFormat,
) -> Result<Box<dyn Vocabulary>, EmotionError> {
    let vocab: Box<dyn Vocabulary> = match format {
        VocabularyFormat::WordIndex => Box::new(WordIndexVocabulary::from_file(path)?),
        VocabularyFormat::Huggingface => Box::new(HfVocabulary::from_file(path)?),
    };
    tracing::info!(
        "Vocabulary loaded from {} ({} ids)",
        path.display(),
        vocab.vocab_size()
    );
    Ok(vocab)
}
