//! Layer abstraction and the serialized model manifest.

use candle_core::Tensor;
use candle_nn::VarBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::EmotionError;

/// One stage of a sequence classifier.
///
/// Layers are rebuilt from a [`LayerSpec`] by a registered builder and can
/// report the config record they were built from, so a loaded model can be
/// written back out as a manifest.
pub trait Layer: Send + Sync {
    /// Registry name this layer is resolved under.
    fn class_name(&self) -> &'static str;

    /// Forward pass. `train` enables dropout; inference always passes `false`.
    fn forward_t(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor>;

    /// Width of the last output dimension.
    fn output_width(&self) -> usize;

    /// Config record this layer can be rebuilt from.
    fn config(&self) -> serde_json::Value;

    /// Longest input sequence the layer accepts, for input layers.
    fn max_sequence_len(&self) -> Option<usize> {
        None
    }
}

/// Serialized description of one layer: class, instance name, config record.
///
/// Weights for the layer live under the `{name}.` prefix of the weight file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub class_name: String,
    pub name: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl LayerSpec {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            config,
        }
    }

    /// Deserialize the config record; a missing record reads as `{}`.
    pub fn parse_config<T: DeserializeOwned>(&self) -> Result<T, EmotionError> {
        let value = if self.config.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            self.config.clone()
        };
        serde_json::from_value(value).map_err(|e| {
            EmotionError::Config(format!(
                "invalid config for layer '{}' ({}): {}",
                self.name, self.class_name, e
            ))
        })
    }
}

/// Everything a builder gets besides the spec.
pub struct BuildContext<'a> {
    /// Weights, already scoped to the layer's name.
    pub vb: VarBuilder<'a>,
    /// Output width of the previous layer; `None` for the input layer.
    pub input_width: Option<usize>,
}

impl BuildContext<'_> {
    /// Input width, or a config error for layers that cannot come first.
    pub fn require_input_width(&self, spec: &LayerSpec) -> Result<usize, EmotionError> {
        self.input_width.ok_or_else(|| {
            EmotionError::Config(format!(
                "layer '{}' ({}) cannot be the first layer of a model",
                spec.name, spec.class_name
            ))
        })
    }
}

/// Architecture half of a model artifact (`model.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub name: String,
    pub layers: Vec<LayerSpec>,
}

pub const MANIFEST_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    MANIFEST_FORMAT_VERSION
}

impl ModelManifest {
    pub fn from_json(json: &str) -> Result<Self, EmotionError> {
        let manifest: ModelManifest = serde_json::from_str(json)?;
        if manifest.format_version != MANIFEST_FORMAT_VERSION {
            return Err(EmotionError::Config(format!(
                "unsupported manifest format_version {} (expected {})",
                manifest.format_version, MANIFEST_FORMAT_VERSION
            )));
        }
        if manifest.layers.is_empty() {
            return Err(EmotionError::Config("model manifest has no layers".to_string()));
        }
        Ok(manifest)
    }

    pub fn to_json(&self) -> Result<String, EmotionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Activation applied after a dense projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Softmax,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Activation::Linear => Ok(xs.clone()),
            Activation::Relu => xs.relu(),
            Activation::Softmax => candle_nn::ops::softmax_last_dim(xs),
            Activation::Sigmoid => candle_nn::ops::sigmoid(xs),
            Activation::Tanh => xs.tanh(),
        }
    }
}
