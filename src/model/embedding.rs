//! `TokenAndPositionEmbedding`: learned token embedding plus learned
//! absolute position embedding.

use candle_core::{Module, Tensor, D};
use candle_nn::{Embedding, VarBuilder};
use serde::{Deserialize, Serialize};

use crate::model::layer::{BuildContext, Layer, LayerSpec};
use crate::EmotionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAndPositionEmbeddingConfig {
    pub maxlen: usize,
    pub vocab_size: usize,
    pub embed_dim: usize,
}

/// Maps `[batch, L]` ids to `[batch, L, embed_dim]` vectors, each the sum of
/// the token's embedding and the embedding of its position `0..L`.
///
/// Weights: `token_emb.weight` (`vocab_size × embed_dim`) and
/// `pos_emb.weight` (`maxlen × embed_dim`).
pub struct TokenAndPositionEmbedding {
    config: TokenAndPositionEmbeddingConfig,
    token_emb: Embedding,
    pos_emb: Embedding,
}

impl TokenAndPositionEmbedding {
    pub const CLASS_NAME: &'static str = "TokenAndPositionEmbedding";

    pub fn new(config: TokenAndPositionEmbeddingConfig, vb: VarBuilder) -> candle_core::Result<Self> {
        if config.maxlen == 0 || config.vocab_size == 0 || config.embed_dim == 0 {
            candle_core::bail!(
                "TokenAndPositionEmbedding needs non-zero maxlen, vocab_size and embed_dim, got {:?}",
                config
            );
        }
        let token_emb = candle_nn::embedding(config.vocab_size, config.embed_dim, vb.pp("token_emb"))?;
        let pos_emb = candle_nn::embedding(config.maxlen, config.embed_dim, vb.pp("pos_emb"))?;
        Ok(Self {
            config,
            token_emb,
            pos_emb,
        })
    }

    /// Registry builder.
    pub fn build(spec: &LayerSpec, ctx: BuildContext<'_>) -> Result<Box<dyn Layer>, EmotionError> {
        let config: TokenAndPositionEmbeddingConfig = spec.parse_config()?;
        let layer = Self::new(config, ctx.vb)
            .map_err(|e| EmotionError::Config(format!("layer '{}': {}", spec.name, e)))?;
        Ok(Box::new(layer))
    }

    pub fn vocab_size(&self) -> usize {
        self.config.vocab_size
    }
}

impl Layer for TokenAndPositionEmbedding {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn forward_t(&self, xs: &Tensor, _train: bool) -> candle_core::Result<Tensor> {
        let seq_len = xs.dim(D::Minus1)?;
        if seq_len > self.config.maxlen {
            candle_core::bail!(
                "sequence length {} exceeds position table size {}",
                seq_len,
                self.config.maxlen
            );
        }
        let positions = Tensor::arange(0u32, seq_len as u32, xs.device())?;
        let positions = self.pos_emb.forward(&positions)?;
        let tokens = self.token_emb.forward(xs)?;
        tokens.broadcast_add(&positions)
    }

    fn output_width(&self) -> usize {
        self.config.embed_dim
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(self.config).unwrap_or_default()
    }

    fn max_sequence_len(&self) -> Option<usize> {
        Some(self.config.maxlen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use std::collections::HashMap;

    fn layer() -> TokenAndPositionEmbedding {
        let device = Device::Cpu;
        let mut tensors = HashMap::new();
        // token i embeds to [i, i, i]; position p embeds to [10p, 10p, 10p]
        let tok: Vec<f32> = (0..5).flat_map(|i| [i as f32; 3]).collect();
        let pos: Vec<f32> = (0..4).flat_map(|p| [10.0 * p as f32; 3]).collect();
        tensors.insert(
            "token_emb.weight".to_string(),
            Tensor::from_vec(tok, (5, 3), &device).expect("tok"),
        );
        tensors.insert(
            "pos_emb.weight".to_string(),
            Tensor::from_vec(pos, (4, 3), &device).expect("pos"),
        );
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        let config = TokenAndPositionEmbeddingConfig {
            maxlen: 4,
            vocab_size: 5,
            embed_dim: 3,
        };
        TokenAndPositionEmbedding::new(config, vb).expect("layer")
    }

    #[test]
    fn test_sums_token_and_position() {
        let ids = Tensor::from_vec(vec![0u32, 0, 2, 4], (1, 4), &Device::Cpu).expect("ids");
        let out = layer().forward_t(&ids, false).expect("forward");
        assert_eq!(out.dims(), &[1, 4, 3]);
        let rows = out.squeeze(0).expect("squeeze").to_vec2::<f32>().expect("vec");
        assert_eq!(rows[0], vec![0.0; 3]);
        assert_eq!(rows[1], vec![10.0; 3]);
        assert_eq!(rows[2], vec![22.0; 3]);
        assert_eq!(rows[3], vec![34.0; 3]);
    }

    #[test]
    fn test_shorter_sequences_use_leading_positions() {
        let ids = Tensor::from_vec(vec![1u32, 1], (1, 2), &Device::Cpu).expect("ids");
        let out = layer().forward_t(&ids, false).expect("forward");
        let rows = out.squeeze(0).expect("squeeze").to_vec2::<f32>().expect("vec");
        assert_eq!(rows, vec![vec![1.0; 3], vec![11.0; 3]]);
    }

    #[test]
    fn test_rejects_sequences_longer_than_maxlen() {
        let ids = Tensor::zeros((1, 5), DType::U32, &Device::Cpu).expect("ids");
        assert!(layer().forward_t(&ids, false).is_err());
    }

    #[test]
    fn test_config_record() {
        let config = layer().config();
        assert_eq!(
            config,
            serde_json::json!({"maxlen": 4, "vocab_size": 5, "embed_dim": 3})
        );
    }
}
