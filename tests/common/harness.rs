//! Artifact harness: writes a complete, tiny artifact set to a temp dir.
//!
//! Two models are available. The keyword model has hand-set weights so the
//! label of a review is predictable; the transformer model has fixed
//! pseudo-random weights and exercises the full custom layer stack.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{Device, Tensor};
use serde_json::json;
use tempfile::TempDir;

pub const MAXLEN: usize = 8;
pub const EMBED_DIM: usize = 4;
pub const LABELS: [&str; 4] = ["anger", "happy", "neutral", "sad"];

/// `<OOV>` is id 1; the rest follow in order.
pub const WORDS: [&str; 6] = ["<OOV>", "senang", "mengecewakan", "cepat", "saya", "sangat"];
pub const VOCAB_SIZE: usize = WORDS.len() + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestModel {
    Keyword,
    Transformer,
}

/// Test harness that owns an artifact directory.
///
/// The directory is removed when the harness is dropped.
pub struct ArtifactHarness {
    pub temp_dir: TempDir,
}

impl ArtifactHarness {
    /// Write every artifact plus a `classifier.toml` matching the model.
    pub fn new(model: TestModel) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for artifacts");
        let harness = Self { temp_dir };

        let (manifest, weights) = match model {
            TestModel::Keyword => (keyword_manifest(), keyword_weights()),
            TestModel::Transformer => (transformer_manifest(), transformer_weights()),
        };
        harness.write_manifest(&manifest);
        candle_core::safetensors::save(&weights, harness.path().join("model.safetensors"))
            .expect("Failed to write weights");
        harness.write("tokenizer.json", &tokenizer_json());
        harness.write_labels(&LABELS);
        harness.write(
            "classifier.toml",
            &format!("[sequence]\nmaxlen = {}\n", MAXLEN),
        );
        harness
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path_buf(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.path().join(name), contents).expect("Failed to write artifact");
    }

    pub fn write_manifest(&self, manifest: &serde_json::Value) {
        self.write(
            "model.json",
            &serde_json::to_string_pretty(manifest).expect("manifest json"),
        );
    }

    pub fn write_labels(&self, labels: &[&str]) {
        self.write("labels.json", &json!({ "classes": labels }).to_string());
    }
}

/// Keras `Tokenizer.to_json()` output with an encoded `word_index`.
pub fn tokenizer_json() -> String {
    let word_index: HashMap<&str, usize> =
        WORDS.iter().enumerate().map(|(i, w)| (*w, i + 1)).collect();
    json!({
        "class_name": "Tokenizer",
        "config": {
            "num_words": null,
            "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": "<OOV>",
            "document_count": 3,
            "word_index": serde_json::to_string(&word_index).expect("word index"),
        }
    })
    .to_string()
}

fn embedding_layer() -> serde_json::Value {
    json!({
        "class_name": "TokenAndPositionEmbedding",
        "name": "embedding",
        "config": { "maxlen": MAXLEN, "vocab_size": VOCAB_SIZE, "embed_dim": EMBED_DIM }
    })
}

/// Embedding → average pooling → softmax head.
pub fn keyword_manifest() -> serde_json::Value {
    json!({
        "format_version": 1,
        "name": "keyword_emotion",
        "layers": [
            embedding_layer(),
            { "class_name": "GlobalAveragePooling1D", "name": "pool", "config": {} },
            {
                "class_name": "Dense",
                "name": "head",
                "config": { "units": LABELS.len(), "activation": "softmax" }
            }
        ]
    })
}

/// Each word votes for one label; padding, OOV and filler words are silent.
/// A small neutral bias makes all-padding input neutral.
pub fn keyword_weights() -> HashMap<String, Tensor> {
    let (happy, neutral, sad) = (1, 2, 3);
    let mut token = vec![0f32; VOCAB_SIZE * EMBED_DIM];
    let mut vote = |id: usize, label: usize, weight: f32| token[id * EMBED_DIM + label] = weight;
    vote(2, happy, 1.0); // senang
    vote(3, sad, 1.0); // mengecewakan
    vote(4, happy, 1.0); // cepat
    vote(5, neutral, 0.1); // saya

    let mut identity = vec![0f32; EMBED_DIM * EMBED_DIM];
    for i in 0..EMBED_DIM {
        identity[i * EMBED_DIM + i] = 8.0;
    }

    let mut weights = HashMap::new();
    weights.insert(
        "embedding.token_emb.weight".to_string(),
        tensor(token, &[VOCAB_SIZE, EMBED_DIM]),
    );
    weights.insert(
        "embedding.pos_emb.weight".to_string(),
        tensor(vec![0.0; MAXLEN * EMBED_DIM], &[MAXLEN, EMBED_DIM]),
    );
    weights.insert("head.weight".to_string(), tensor(identity, &[EMBED_DIM, EMBED_DIM]));
    weights.insert("head.bias".to_string(), tensor(vec![0.0, 0.0, 0.05, 0.0], &[EMBED_DIM]));
    weights
}

/// Embedding → transformer block → pooling → dropout → relu → softmax head.
pub fn transformer_manifest() -> serde_json::Value {
    json!({
        "format_version": 1,
        "name": "review_emotion_transformer",
        "layers": [
            embedding_layer(),
            {
                "class_name": "TransformerBlock",
                "name": "transformer_block",
                "config": { "embed_dim": EMBED_DIM, "num_heads": 2, "ff_dim": 8, "rate": 0.1 }
            },
            { "class_name": "GlobalAveragePooling1D", "name": "pool", "config": {} },
            { "class_name": "Dropout", "name": "dropout", "config": { "rate": 0.1 } },
            { "class_name": "Dense", "name": "hidden", "config": { "units": 6, "activation": "relu" } },
            {
                "class_name": "Dense",
                "name": "head",
                "config": { "units": LABELS.len(), "activation": "softmax" }
            }
        ]
    })
}

pub fn transformer_weights() -> HashMap<String, Tensor> {
    let inner = 2 * EMBED_DIM;
    let mut rng = Lcg(0x5eed);
    let mut weights = HashMap::new();
    let mut add = |name: &str, shape: &[usize], rng: &mut Lcg| {
        let n = shape.iter().product();
        weights.insert(name.to_string(), tensor(rng.take(n), shape));
    };

    add("embedding.token_emb.weight", &[VOCAB_SIZE, EMBED_DIM], &mut rng);
    add("embedding.pos_emb.weight", &[MAXLEN, EMBED_DIM], &mut rng);
    for proj in ["query", "key", "value"] {
        add(&format!("transformer_block.att.{}.weight", proj), &[inner, EMBED_DIM], &mut rng);
        add(&format!("transformer_block.att.{}.bias", proj), &[inner], &mut rng);
    }
    add("transformer_block.att.output.weight", &[EMBED_DIM, inner], &mut rng);
    add("transformer_block.att.output.bias", &[EMBED_DIM], &mut rng);
    add("transformer_block.ffn.0.weight", &[8, EMBED_DIM], &mut rng);
    add("transformer_block.ffn.0.bias", &[8], &mut rng);
    add("transformer_block.ffn.1.weight", &[EMBED_DIM, 8], &mut rng);
    add("transformer_block.ffn.1.bias", &[EMBED_DIM], &mut rng);
    add("hidden.weight", &[6, EMBED_DIM], &mut rng);
    add("hidden.bias", &[6], &mut rng);
    add("head.weight", &[LABELS.len(), 6], &mut rng);
    add("head.bias", &[LABELS.len()], &mut rng);

    for norm in ["layernorm1", "layernorm2"] {
        weights.insert(
            format!("transformer_block.{}.weight", norm),
            tensor(vec![1.0; EMBED_DIM], &[EMBED_DIM]),
        );
        weights.insert(
            format!("transformer_block.{}.bias", norm),
            tensor(vec![0.0; EMBED_DIM], &[EMBED_DIM]),
        );
    }
    weights
}

fn tensor(data: Vec<f32>, shape: &[usize]) -> Tensor {
    Tensor::from_vec(data, shape, &Device::Cpu).expect("Failed to build tensor")
}

/// Deterministic weights in [-0.5, 0.5).
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32 / (1u64 << 24) as f32) - 0.5
    }

    fn take(&mut self, n: usize) -> Vec<f32> {
        (0..n).map(|_| self.next()).collect()
    }
}
