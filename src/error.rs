use std::path::PathBuf;

use thiserror::Error;

/// Error type for review-emotion operations.
#[derive(Debug, Error)]
pub enum EmotionError {
    /// A model, vocabulary, or label artifact could not be loaded.
    #[error("Failed to load artifact '{}': {message}", path.display())]
    Artifact { path: PathBuf, message: String },

    /// The model manifest names a layer class nobody registered.
    #[error("Unresolvable component: no layer registered under class name '{class_name}'")]
    UnresolvableComponent { class_name: String },

    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Uploaded file is neither CSV nor XLSX.
    #[error("Unsupported file format: {0}. Please provide a CSV or Excel (.xlsx) file")]
    UnsupportedFormat(String),

    /// Tabular input is missing the text column or is otherwise malformed.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Single-text prediction was requested with nothing to classify.
    #[error("Empty input: nothing to classify")]
    EmptyInput,

    /// Forward pass or tensor manipulation failed.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Text could not be tokenized.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// A class index outside the label set was decoded.
    #[error("Label index {index} out of range for {num_labels} labels")]
    LabelIndexOutOfRange { index: usize, num_labels: usize },

    /// A label name outside the label set was encoded.
    #[error("Unknown label: '{0}'")]
    UnknownLabel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<candle_core::Error> for EmotionError {
    fn from(err: candle_core::Error) -> Self {
        EmotionError::Inference(err.to_string())
    }
}

impl From<serde_json::Error> for EmotionError {
    fn from(err: serde_json::Error) -> Self {
        EmotionError::Config(format!("JSON error: {}", err))
    }
}

impl From<csv::Error> for EmotionError {
    fn from(err: csv::Error) -> Self {
        EmotionError::MalformedInput(format!("CSV error: {}", err))
    }
}

impl From<calamine::XlsxError> for EmotionError {
    fn from(err: calamine::XlsxError) -> Self {
        EmotionError::MalformedInput(format!("Excel error: {}", err))
    }
}

impl From<rust_xlsxwriter::XlsxError> for EmotionError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        EmotionError::Io(std::io::Error::other(format!("Excel writer error: {}", err)))
    }
}

impl EmotionError {
    /// Build an [`EmotionError::Artifact`] for the given path.
    pub fn artifact(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        EmotionError::Artifact {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
