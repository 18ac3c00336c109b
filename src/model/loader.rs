use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use serde::Deserialize;
use tokenizers::Encoding;

const CONFIG_JSON: &str = "config.json";
const SAFETENSORS: &str = "model.safetensors";
const PYTORCH_BIN: &str = "pytorch_model.bin";

#[derive(Debug, Clone)]
pub struct CheckpointMetadata {
    pub model_type: String,
    pub hidden_size: usize,
    pub num_layers: usize,
    pub num_heads: usize,
    pub vocab_size: usize,
    pub max_position_embeddings: usize,
    pub weights_file: PathBuf,
    pub weights_size: u64,
}

/// Fields of `config.json` reported back to callers.
#[derive(Deserialize)]
struct ConfigSummary {
    #[serde(default)]
    model_type: Option<String>,
    hidden_size: usize,
    num_hidden_layers: usize,
    num_attention_heads: usize,
    vocab_size: usize,
    max_position_embeddings: usize,
}

pub struct BertEncoder {
    model: BertModel,
    metadata: CheckpointMetadata,
    device: Device,
}

impl BertEncoder {
    pub fn load(dir: &Path, device: &Device) -> Result<Self> {
        let config_path = dir.join(CONFIG_JSON);
        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read model config: {:?}", config_path))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse BERT config: {:?}", config_path))?;
        let summary: ConfigSummary = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse BERT config: {:?}", config_path))?;

        let weights_file = find_weights(dir)?;
        let weights_size = fs::metadata(&weights_file)?.len();

        let vb = if weights_file.extension().is_some_and(|ext| ext == "safetensors") {
            // SAFETY: the file is not expected to change while mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_file], DTYPE, device) }
                .with_context(|| format!("Failed to map weights: {:?}", weights_file))?
        } else {
            VarBuilder::from_pth(&weights_file, DTYPE, device)
                .with_context(|| format!("Failed to read weights: {:?}", weights_file))?
        };

        let model = BertModel::load(vb, &config)
            .with_context(|| "Failed to build BERT model from checkpoint weights")?;

        let metadata = CheckpointMetadata {
            model_type: summary.model_type.unwrap_or_else(|| "bert".to_string()),
            hidden_size: summary.hidden_size,
            num_layers: summary.num_hidden_layers,
            num_heads: summary.num_attention_heads,
            vocab_size: summary.vocab_size,
            max_position_embeddings: summary.max_position_embeddings,
            weights_file,
            weights_size,
        };

        tracing::info!(
            "Loaded model: {} ({} layers, {} hidden, {} heads, {} vocab)",
            metadata.model_type,
            metadata.num_layers,
            metadata.hidden_size,
            metadata.num_heads,
            metadata.vocab_size
        );

        Ok(Self {
            model,
            metadata,
            device: device.clone(),
        })
    }

    pub fn metadata(&self) -> &CheckpointMetadata {
        &self.metadata
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Run the encoder. All inputs are `[batch, seq]`; output is `[batch, seq, hidden]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        Ok(self
            .model
            .forward(input_ids, token_type_ids, attention_mask)?)
    }

    /// Hidden state of the `[CLS]` position for a single encoding.
    pub fn embed(&self, encoding: &Encoding) -> Result<Vec<f32>> {
        if encoding.len() > self.metadata.max_position_embeddings {
            anyhow::bail!(
                "Input has {} tokens, model accepts at most {}",
                encoding.len(),
                self.metadata.max_position_embeddings
            );
        }

        let ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self.forward(&ids, &type_ids, Some(&mask))?;
        Ok(hidden.get(0)?.get(0)?.to_vec1::<f32>()?)
    }
}

fn find_weights(dir: &Path) -> Result<PathBuf> {
    for name in [SAFETENSORS, PYTORCH_BIN] {
        let path = dir.join(name);
        if path.is_file() {
            tracing::debug!("Using weights {:?}", path);
            return Ok(path);
        }
    }
    anyhow::bail!("No {} or {} in {:?}", SAFETENSORS, PYTORCH_BIN, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{
        tiny_checkpoint, tiny_config, tiny_full_checkpoint, HIDDEN, MAX_POS, VOCAB,
    };
    use crate::model::BertTokenizer;
    use tempfile::TempDir;

    #[test]
    fn loads_safetensors_checkpoint() {
        let dir = tiny_checkpoint();
        let encoder = BertEncoder::load(dir.path(), &Device::Cpu).unwrap();

        let meta = encoder.metadata();
        assert_eq!(meta.model_type, "bert");
        assert_eq!(meta.hidden_size, HIDDEN);
        assert_eq!(meta.num_layers, 1);
        assert_eq!(meta.num_heads, 2);
        assert_eq!(meta.vocab_size, VOCAB);
        assert_eq!(meta.weights_file, dir.path().join(SAFETENSORS));
        assert!(meta.weights_size > 0);
    }

    #[test]
    fn forward_keeps_sequence_shape() {
        let dir = tiny_checkpoint();
        let encoder = BertEncoder::load(dir.path(), &Device::Cpu).unwrap();

        let ids = Tensor::new(&[[2u32, 5, 6, 3]], &Device::Cpu).unwrap();
        let type_ids = ids.zeros_like().unwrap();
        let hidden = encoder.forward(&ids, &type_ids, None).unwrap();
        assert_eq!(hidden.dims(), &[1, 4, HIDDEN]);
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = BertEncoder::load(dir.path(), &Device::Cpu).err().unwrap();
        assert!(format!("{:#}", err).contains("config.json"));
    }

    #[test]
    fn missing_weights_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_JSON), tiny_config()).unwrap();
        let err = BertEncoder::load(dir.path(), &Device::Cpu).err().unwrap();
        assert!(err.to_string().contains("model.safetensors"));
    }

    #[test]
    fn safetensors_preferred_over_pytorch_bin() {
        let dir = tiny_checkpoint();
        // Unreadable as a pickle; loading succeeds only if it is never opened.
        fs::write(dir.path().join(PYTORCH_BIN), b"not a torch archive").unwrap();

        let encoder = BertEncoder::load(dir.path(), &Device::Cpu).unwrap();
        assert_eq!(encoder.metadata().weights_file, dir.path().join(SAFETENSORS));
    }

    #[test]
    fn pytorch_bin_used_without_safetensors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_JSON), tiny_config()).unwrap();
        fs::write(dir.path().join(PYTORCH_BIN), b"not a torch archive").unwrap();

        assert_eq!(find_weights(dir.path()).unwrap(), dir.path().join(PYTORCH_BIN));

        let err = BertEncoder::load(dir.path(), &Device::Cpu).err().unwrap();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Failed to read weights"));
        assert!(msg.contains(PYTORCH_BIN));
    }

    #[test]
    fn embed_rejects_input_longer_than_positions() {
        let dir = tiny_full_checkpoint();
        let tokenizer = BertTokenizer::from_dir(dir.path()).unwrap();
        let encoder = BertEncoder::load(dir.path(), &Device::Cpu).unwrap();

        let long = vec!["hello"; MAX_POS].join(" ");
        let encoding = tokenizer.encode(&long).unwrap();
        assert_eq!(encoding.len(), MAX_POS + 2);

        let err = encoder.embed(&encoding).err().unwrap();
        assert_eq!(
            err.to_string(),
            format!("Input has {} tokens, model accepts at most {}", MAX_POS + 2, MAX_POS)
        );

        let fits = vec!["hello"; MAX_POS - 2].join(" ");
        let encoding = tokenizer.encode(&fits).unwrap();
        assert_eq!(encoder.embed(&encoding).unwrap().len(), HIDDEN);
    }
}
