//! Sequence classifier rebuilt from a layer manifest and safetensors weights.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use tracing::{debug, info};

use crate::model::layer::{BuildContext, Layer, LayerSpec, ModelManifest};
use crate::model::registry::LayerRegistry;
use crate::model::ScoreModel;
use crate::text::PaddedBatch;
use crate::EmotionError;

struct NamedLayer {
    name: String,
    layer: Box<dyn Layer>,
}

/// Token+position embedding → transformer block(s) → pooling → dense head.
///
/// The layer stack is whatever the manifest lists, resolved through a
/// [`LayerRegistry`]. The first layer must accept token ids and declare a
/// maximum sequence length; the last must produce `[batch, num_labels]`.
pub struct SequenceClassifier {
    name: String,
    layers: Vec<NamedLayer>,
    device: Device,
    maxlen: usize,
    vocab_size: Option<usize>,
    num_labels: usize,
}

impl SequenceClassifier {
    /// Load `model.json` + `model.safetensors`.
    pub fn load(
        manifest_path: &Path,
        weights_path: &Path,
        registry: &LayerRegistry,
        device: Device,
    ) -> Result<Self, EmotionError> {
        let json = std::fs::read_to_string(manifest_path)
            .map_err(|e| EmotionError::artifact(manifest_path, e))?;
        let manifest =
            ModelManifest::from_json(&json).map_err(|e| EmotionError::artifact(manifest_path, e))?;

        if !weights_path.exists() {
            return Err(EmotionError::artifact(weights_path, "file not found"));
        }
        // SAFETY: the mmapped safetensors file must not be modified
        // while the model is in use.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| EmotionError::artifact(weights_path, e))?
        };

        let model = Self::from_manifest(&manifest, vb, registry, device)?;
        info!(
            "Model '{}' loaded from {} ({} layers, maxlen {}, {} labels)",
            model.name,
            manifest_path.display(),
            model.layers.len(),
            model.maxlen,
            model.num_labels
        );
        Ok(model)
    }

    /// Build from an already parsed manifest and a weight source.
    pub fn from_manifest(
        manifest: &ModelManifest,
        vb: VarBuilder,
        registry: &LayerRegistry,
        device: Device,
    ) -> Result<Self, EmotionError> {
        let mut layers = Vec::with_capacity(manifest.layers.len());
        let mut width: Option<usize> = None;

        for spec in &manifest.layers {
            let ctx = BuildContext {
                vb: vb.pp(spec.name.as_str()),
                input_width: width,
            };
            let layer = registry.build(spec, ctx)?;
            debug!(
                "Built layer '{}' ({}) -> width {}",
                spec.name,
                layer.class_name(),
                layer.output_width()
            );
            width = Some(layer.output_width());
            layers.push(NamedLayer {
                name: spec.name.clone(),
                layer,
            });
        }

        let first = layers
            .first()
            .ok_or_else(|| EmotionError::Config("model manifest has no layers".to_string()))?;
        let maxlen = first.layer.max_sequence_len().ok_or_else(|| {
            EmotionError::Config(format!(
                "first layer '{}' ({}) does not accept token ids",
                first.name,
                first.layer.class_name()
            ))
        })?;
        let vocab_size = first
            .layer
            .config()
            .get("vocab_size")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize);

        let mut model = Self {
            name: manifest.name.clone(),
            layers,
            device,
            maxlen,
            vocab_size,
            num_labels: 0,
        };

        // Run one all-padding row to learn (and validate) the output shape.
        let padding_row = Tensor::zeros((1, maxlen), DType::U32, &model.device)?;
        let output = model.forward_t(&padding_row, false)?;
        let (_, num_labels) = output.dims2().map_err(|_| {
            EmotionError::Config(format!(
                "model output must be [batch, labels], got shape {:?}",
                output.dims()
            ))
        })?;
        if num_labels == 0 {
            return Err(EmotionError::Config("model produces zero labels".to_string()));
        }
        model.num_labels = num_labels;

        Ok(model)
    }

    /// Run every layer in order.
    pub fn forward_t(&self, ids: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        let mut xs = ids.clone();
        for named in &self.layers {
            xs = named.layer.forward_t(&xs, train)?;
        }
        Ok(xs)
    }

    /// Manifest describing the loaded layer stack, rebuilt from each layer's
    /// config record.
    pub fn manifest(&self) -> ModelManifest {
        ModelManifest {
            format_version: crate::model::layer::MANIFEST_FORMAT_VERSION,
            name: self.name.clone(),
            layers: self
                .layers
                .iter()
                .map(|named| {
                    LayerSpec::new(named.layer.class_name(), named.name.clone(), named.layer.config())
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vocabulary size of the embedding table, when the input layer reports one.
    pub fn vocab_size(&self) -> Option<usize> {
        self.vocab_size
    }
}

impl ScoreModel for SequenceClassifier {
    fn predict(&self, batch: &PaddedBatch) -> Result<Vec<Vec<f32>>, EmotionError> {
        if batch.is_empty() {
            return Ok(vec![]);
        }
        if batch.maxlen() > self.maxlen {
            return Err(EmotionError::Inference(format!(
                "batch sequence length {} exceeds model maxlen {}",
                batch.maxlen(),
                self.maxlen
            )));
        }
        if let Some(vocab_size) = self.vocab_size {
            if let Some(&bad) = batch.as_slice().iter().find(|&&id| id as usize >= vocab_size) {
                return Err(EmotionError::Inference(format!(
                    "token id {} outside model vocabulary of {}",
                    bad, vocab_size
                )));
            }
        }

        let ids = Tensor::from_slice(batch.as_slice(), (batch.rows(), batch.maxlen()), &self.device)?;
        let scores = self.forward_t(&ids, false)?;
        let scores = scores.to_dtype(DType::F32)?.to_vec2::<f32>()?;
        debug!("Scored batch of {} rows", scores.len());
        Ok(scores)
    }

    fn num_labels(&self) -> usize {
        self.num_labels
    }

    fn maxlen(&self) -> usize {
        self.maxlen
    }
}
