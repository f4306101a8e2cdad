//! `TransformerBlock`: one self-attention + feed-forward encoder block.

use candle_core::{Module, Tensor};
use candle_nn::{Dropout, LayerNorm, Linear, VarBuilder};
use serde::{Deserialize, Serialize};

use crate::model::layer::{BuildContext, Layer, LayerSpec};
use crate::EmotionError;

pub(crate) const LAYER_NORM_EPS: f64 = 1e-6;

fn default_rate() -> f64 {
    0.1
}

/// Config record of a transformer block: exactly these four fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformerBlockConfig {
    pub embed_dim: usize,
    pub num_heads: usize,
    pub ff_dim: usize,
    #[serde(default = "default_rate")]
    pub rate: f64,
}

/// Multi-head self-attention where every head has `key_dim` features.
///
/// Projections: `query`, `key`, `value` map `embed_dim → num_heads·key_dim`;
/// `output` maps back to `embed_dim`.
struct MultiHeadAttention {
    query: Linear,
    key: Linear,
    value: Linear,
    output: Linear,
    num_heads: usize,
    key_dim: usize,
}

impl MultiHeadAttention {
    fn new(
        embed_dim: usize,
        num_heads: usize,
        key_dim: usize,
        vb: VarBuilder,
    ) -> candle_core::Result<Self> {
        let inner = num_heads * key_dim;
        Ok(Self {
            query: candle_nn::linear(embed_dim, inner, vb.pp("query"))?,
            key: candle_nn::linear(embed_dim, inner, vb.pp("key"))?,
            value: candle_nn::linear(embed_dim, inner, vb.pp("value"))?,
            output: candle_nn::linear(inner, embed_dim, vb.pp("output"))?,
            num_heads,
            key_dim,
        })
    }

    /// `[batch, L, embed_dim]` → `[batch, L, embed_dim]`.
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let (batch, seq_len, _) = xs.dims3()?;

        // [batch, L, heads·key_dim] -> [batch, heads, L, key_dim]
        let split_heads = |t: Tensor| -> candle_core::Result<Tensor> {
            t.reshape((batch, seq_len, self.num_heads, self.key_dim))?
                .transpose(1, 2)?
                .contiguous()
        };

        let q = split_heads(self.query.forward(xs)?)?;
        let k = split_heads(self.key.forward(xs)?)?;
        let v = split_heads(self.value.forward(xs)?)?;

        let scale = 1.0 / (self.key_dim as f64).sqrt();
        let scores = (q.matmul(&k.t()?.contiguous()?)? * scale)?;
        let weights = candle_nn::ops::softmax_last_dim(&scores)?;

        let context = weights
            .matmul(&v)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((batch, seq_len, self.num_heads * self.key_dim))?;
        self.output.forward(&context)
    }
}

/// Transformer encoder block.
///
/// ```text
/// out1 = layernorm1(x + dropout1(attention(x, x)))
/// out  = layernorm2(out1 + dropout2(ffn(out1)))
/// ffn  = Dense(ff_dim, relu) -> Dense(embed_dim)
/// ```
///
/// Attention uses `key_dim = embed_dim`. Dropout is active only when
/// `train` is set, so inference is deterministic.
pub struct TransformerBlock {
    config: TransformerBlockConfig,
    att: MultiHeadAttention,
    ffn_hidden: Linear,
    ffn_out: Linear,
    layernorm1: LayerNorm,
    layernorm2: LayerNorm,
    dropout1: Dropout,
    dropout2: Dropout,
}

impl TransformerBlock {
    pub const CLASS_NAME: &'static str = "TransformerBlock";

    pub fn new(config: TransformerBlockConfig, vb: VarBuilder) -> candle_core::Result<Self> {
        if config.embed_dim == 0 || config.num_heads == 0 || config.ff_dim == 0 {
            candle_core::bail!(
                "TransformerBlock needs non-zero embed_dim, num_heads and ff_dim, got {:?}",
                config
            );
        }
        if !(0.0..1.0).contains(&config.rate) {
            candle_core::bail!("dropout rate must be in [0, 1), got {}", config.rate);
        }

        let embed_dim = config.embed_dim;
        let att = MultiHeadAttention::new(embed_dim, config.num_heads, embed_dim, vb.pp("att"))?;
        let ffn_hidden = candle_nn::linear(embed_dim, config.ff_dim, vb.pp("ffn.0"))?;
        let ffn_out = candle_nn::linear(config.ff_dim, embed_dim, vb.pp("ffn.1"))?;
        let layernorm1 = candle_nn::layer_norm(embed_dim, LAYER_NORM_EPS, vb.pp("layernorm1"))?;
        let layernorm2 = candle_nn::layer_norm(embed_dim, LAYER_NORM_EPS, vb.pp("layernorm2"))?;

        Ok(Self {
            config,
            att,
            ffn_hidden,
            ffn_out,
            layernorm1,
            layernorm2,
            dropout1: Dropout::new(config.rate as f32),
            dropout2: Dropout::new(config.rate as f32),
        })
    }

    /// Registry builder.
    pub fn build(spec: &LayerSpec, ctx: BuildContext<'_>) -> Result<Box<dyn Layer>, EmotionError> {
        let config: TransformerBlockConfig = spec.parse_config()?;
        let input_width = ctx.require_input_width(spec)?;
        if input_width != config.embed_dim {
            return Err(EmotionError::Config(format!(
                "layer '{}': embed_dim {} does not match input width {}",
                spec.name, config.embed_dim, input_width
            )));
        }
        let block = Self::new(config, ctx.vb)
            .map_err(|e| EmotionError::Config(format!("layer '{}': {}", spec.name, e)))?;
        Ok(Box::new(block))
    }
}

impl Layer for TransformerBlock {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn forward_t(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        let attn = self.att.forward(xs)?;
        let attn = self.dropout1.forward(&attn, train)?;
        let out1 = self.layernorm1.forward(&(xs + &attn)?)?;

        let ffn = self.ffn_hidden.forward(&out1)?.relu()?;
        let ffn = self.ffn_out.forward(&ffn)?;
        let ffn = self.dropout2.forward(&ffn, train)?;
        self.layernorm2.forward(&(&out1 + &ffn)?)
    }

    fn output_width(&self) -> usize {
        self.config.embed_dim
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(self.config).unwrap_or_default()
    }
}
