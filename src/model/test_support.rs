//! Fixtures for tests that need a checkpoint on disk without downloading one.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{Device, Tensor};
use candle_transformers::models::bert::DTYPE;
use tempfile::TempDir;

pub const VOCAB_TOKENS: &[&str] = &[
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "hello", "world", "##s", "the", "a",
];

pub const HIDDEN: usize = 8;
const INTERMEDIATE: usize = 16;
pub const VOCAB: usize = 10;
pub const MAX_POS: usize = 16;

pub fn tiny_config() -> String {
    serde_json::json!({
        "architectures": ["BertModel"],
        "model_type": "bert",
        "vocab_size": VOCAB,
        "hidden_size": HIDDEN,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "intermediate_size": INTERMEDIATE,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.1,
        "attention_probs_dropout_prob": 0.1,
        "max_position_embeddings": MAX_POS,
        "type_vocab_size": 2,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-12,
        "pad_token_id": 0,
        "position_embedding_type": "absolute"
    })
    .to_string()
}

fn tiny_weights() -> HashMap<String, Tensor> {
    let dev = Device::Cpu;
    let mut tensors = HashMap::new();
    let mut dense = |name: &str, out_dim: usize, in_dim: usize| {
        tensors.insert(
            format!("{name}.weight"),
            Tensor::randn(0f32, 0.02, (out_dim, in_dim), &dev).unwrap(),
        );
        tensors.insert(
            format!("{name}.bias"),
            Tensor::zeros(out_dim, DTYPE, &dev).unwrap(),
        );
    };
    dense("encoder.layer.0.attention.self.query", HIDDEN, HIDDEN);
    dense("encoder.layer.0.attention.self.key", HIDDEN, HIDDEN);
    dense("encoder.layer.0.attention.self.value", HIDDEN, HIDDEN);
    dense("encoder.layer.0.attention.output.dense", HIDDEN, HIDDEN);
    dense("encoder.layer.0.intermediate.dense", INTERMEDIATE, HIDDEN);
    dense("encoder.layer.0.output.dense", HIDDEN, INTERMEDIATE);

    for (name, rows) in [
        ("word_embeddings", VOCAB),
        ("position_embeddings", MAX_POS),
        ("token_type_embeddings", 2),
    ] {
        tensors.insert(
            format!("embeddings.{name}.weight"),
            Tensor::randn(0f32, 0.02, (rows, HIDDEN), &dev).unwrap(),
        );
    }

    for norm in [
        "embeddings.LayerNorm",
        "encoder.layer.0.attention.output.LayerNorm",
        "encoder.layer.0.output.LayerNorm",
    ] {
        tensors.insert(
            format!("{norm}.weight"),
            Tensor::ones(HIDDEN, DTYPE, &dev).unwrap(),
        );
        tensors.insert(
            format!("{norm}.bias"),
            Tensor::zeros(HIDDEN, DTYPE, &dev).unwrap(),
        );
    }
    tensors
}

pub fn tiny_checkpoint() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.json"), tiny_config()).unwrap();
    candle_core::safetensors::save(&tiny_weights(), dir.path().join("model.safetensors")).unwrap();
    dir
}

pub fn write_vocab(dir: &Path) {
    fs::write(dir.join("vocab.txt"), VOCAB_TOKENS.join("\n")).unwrap();
}

/// Weights, config and vocabulary in one directory.
pub fn tiny_full_checkpoint() -> TempDir {
    let dir = tiny_checkpoint();
    write_vocab(dir.path());
    dir
}
