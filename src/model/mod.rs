pub mod loader;
pub mod tokenizer;

#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use candle_core::Device;

use crate::error::LoadError;

pub use loader::{BertEncoder, CheckpointMetadata};
pub use tokenizer::BertTokenizer;

/// Pretrained model families that can be loaded from a local checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    BertBaseUncased,
}

impl ModelKind {
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::BertBaseUncased => "bert-base-uncased",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bert-base-uncased" => Ok(ModelKind::BertBaseUncased),
            other => Err(LoadError::unsupported(other)),
        }
    }
}

/// Builds tokenizers and models from a checkpoint directory on local disk.
///
/// Implementations must not reach for the network: a directory either holds
/// everything needed or loading fails.
pub trait CheckpointLoader {
    type Tokenizer;
    type Model;

    fn load_tokenizer_from_dir(&self, dir: &Path) -> Result<Self::Tokenizer>;
    fn load_model_from_dir(&self, dir: &Path) -> Result<Self::Model>;
}

/// Loader backed by `tokenizers` and candle's BERT implementation.
#[derive(Clone, Debug)]
pub struct LocalCheckpointLoader {
    device: Device,
}

impl LocalCheckpointLoader {
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl Default for LocalCheckpointLoader {
    fn default() -> Self {
        Self::new(Device::Cpu)
    }
}

impl CheckpointLoader for LocalCheckpointLoader {
    type Tokenizer = BertTokenizer;
    type Model = BertEncoder;

    fn load_tokenizer_from_dir(&self, dir: &Path) -> Result<BertTokenizer> {
        BertTokenizer::from_dir(dir)
    }

    fn load_model_from_dir(&self, dir: &Path) -> Result<BertEncoder> {
        BertEncoder::load(dir, &self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_bert_base_uncased() {
        assert_eq!(
            "bert-base-uncased".parse::<ModelKind>().unwrap(),
            ModelKind::BertBaseUncased
        );
        for other in ["roberta-base", "bert-base-cased", "BERT-BASE-UNCASED", ""] {
            match other.parse::<ModelKind>() {
                Err(LoadError::UnsupportedModelKind(id)) => assert_eq!(id, other),
                res => panic!("expected unsupported for {:?}, got {:?}", other, res),
            }
        }
    }

    #[test]
    fn display_matches_id() {
        assert_eq!(ModelKind::BertBaseUncased.to_string(), "bert-base-uncased");
    }
}
