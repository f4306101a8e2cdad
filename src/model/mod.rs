//! The emotion classifier: layers, the layer registry, and model loading.
//!
//! [`ScoreModel`] is the seam the inference pipeline talks to; the candle
//! implementation is [`SequenceClassifier`].

pub mod classifier;
pub mod core_layers;
pub mod device;
pub mod embedding;
pub mod layer;
pub mod registry;
pub mod transformer;

use crate::text::PaddedBatch;
use crate::EmotionError;

pub use classifier::SequenceClassifier;
pub use device::select_device;
pub use embedding::{TokenAndPositionEmbedding, TokenAndPositionEmbeddingConfig};
pub use layer::{Activation, BuildContext, Layer, LayerSpec, ModelManifest};
pub use registry::{register_custom_layers, LayerBuilder, LayerRegistry};
pub use transformer::{TransformerBlock, TransformerBlockConfig};

/// Scores padded token-id batches.
pub trait ScoreModel: Send + Sync {
    /// One score vector of length [`num_labels`](Self::num_labels) per row,
    /// in row order. The whole batch is scored in one call.
    fn predict(&self, batch: &PaddedBatch) -> Result<Vec<Vec<f32>>, EmotionError>;

    fn num_labels(&self) -> usize;

    /// Longest sequence the model accepts.
    fn maxlen(&self) -> usize;
}
