//! Built-in layers every registry knows: `Dense`, `Dropout`,
//! `GlobalAveragePooling1D`.

use candle_core::{Module, Tensor};
use candle_nn::Linear;
use serde::{Deserialize, Serialize};

use crate::model::layer::{Activation, BuildContext, Layer, LayerSpec};
use crate::EmotionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseConfig {
    pub units: usize,
    #[serde(default)]
    pub activation: Activation,
}

/// Fully connected projection over the last dimension. Weights `weight`
/// (`units × input_width`) and `bias` (`units`).
pub struct Dense {
    config: DenseConfig,
    linear: Linear,
}

impl Dense {
    pub const CLASS_NAME: &'static str = "Dense";

    pub fn build(spec: &LayerSpec, ctx: BuildContext<'_>) -> Result<Box<dyn Layer>, EmotionError> {
        let config: DenseConfig = spec.parse_config()?;
        let input_width = ctx.require_input_width(spec)?;
        let linear = candle_nn::linear(input_width, config.units, ctx.vb)
            .map_err(|e| EmotionError::Config(format!("layer '{}': {}", spec.name, e)))?;
        Ok(Box::new(Self { config, linear }))
    }
}

impl Layer for Dense {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn forward_t(&self, xs: &Tensor, _train: bool) -> candle_core::Result<Tensor> {
        let projected = self.linear.forward(xs)?;
        self.config.activation.apply(&projected)
    }

    fn output_width(&self) -> usize {
        self.config.units
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(self.config).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropoutConfig {
    #[serde(default)]
    pub rate: f64,
}

/// Dropout; identity unless `train` is set.
pub struct DropoutLayer {
    config: DropoutConfig,
    dropout: candle_nn::Dropout,
    width: usize,
}

impl DropoutLayer {
    pub const CLASS_NAME: &'static str = "Dropout";

    pub fn build(spec: &LayerSpec, ctx: BuildContext<'_>) -> Result<Box<dyn Layer>, EmotionError> {
        let config: DropoutConfig = spec.parse_config()?;
        if !(0.0..1.0).contains(&config.rate) {
            return Err(EmotionError::Config(format!(
                "layer '{}': dropout rate must be in [0, 1), got {}",
                spec.name, config.rate
            )));
        }
        let width = ctx.require_input_width(spec)?;
        Ok(Box::new(Self {
            config,
            dropout: candle_nn::Dropout::new(config.rate as f32),
            width,
        }))
    }
}

impl Layer for DropoutLayer {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn forward_t(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        self.dropout.forward(xs, train)
    }

    fn output_width(&self) -> usize {
        self.width
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(self.config).unwrap_or_default()
    }
}

/// Mean over the sequence axis: `[batch, L, D]` → `[batch, D]`.
pub struct GlobalAveragePooling1D {
    width: usize,
}

impl GlobalAveragePooling1D {
    pub const CLASS_NAME: &'static str = "GlobalAveragePooling1D";

    pub fn build(spec: &LayerSpec, ctx: BuildContext<'_>) -> Result<Box<dyn Layer>, EmotionError> {
        let width = ctx.require_input_width(spec)?;
        Ok(Box::new(Self { width }))
    }
}

impl Layer for GlobalAveragePooling1D {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn forward_t(&self, xs: &Tensor, _train: bool) -> candle_core::Result<Tensor> {
        let (_batch, _seq_len, _dim) = xs.dims3()?;
        xs.mean(1)
    }

    fn output_width(&self) -> usize {
        self.width
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}
