use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::LoaderConfig;
use crate::error::{Artifact, LoadError};
use crate::model::{CheckpointLoader, LocalCheckpointLoader, ModelKind};
use crate::resolver;

/// Locates a local checkpoint and hands it to a [`CheckpointLoader`].
///
/// Every call resolves and validates the directory afresh; nothing loaded is
/// kept, so tokenizer and model loads are independent of each other.
///
/// # Example
///
/// ```rust,ignore
/// use bert_local::{CheckpointLocator, LoaderConfig};
///
/// let locator = CheckpointLocator::local(LoaderConfig::from_env());
/// let tokenizer = locator.load_tokenizer("bert-base-uncased", None)?;
/// let model = locator.load_model("bert-base-uncased", None)?;
/// ```
pub struct CheckpointLocator<L> {
    config: LoaderConfig,
    loader: L,
}

impl CheckpointLocator<LocalCheckpointLoader> {
    /// Locator backed by the CPU candle/tokenizers loader.
    pub fn local(config: LoaderConfig) -> Self {
        Self::new(config, LocalCheckpointLoader::default())
    }
}

impl<L: CheckpointLoader> CheckpointLocator<L> {
    pub fn new(config: LoaderConfig, loader: L) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Directory used when no explicit path is given.
    pub fn default_path(&self) -> PathBuf {
        resolver::resolve_default_path(&self.config)
    }

    /// Load the tokenizer of `model_type` from `explicit_path` or the default directory.
    ///
    /// Errors from the loader itself are returned untouched.
    pub fn load_tokenizer(
        &self,
        model_type: &str,
        explicit_path: Option<&Path>,
    ) -> Result<L::Tokenizer> {
        let dir = self.checkpoint_dir(model_type, explicit_path, Artifact::Tokenizer)?;
        tracing::info!("Using local BERT tokenizer: {}", dir.display());
        self.loader.load_tokenizer_from_dir(&dir)
    }

    /// Load the encoder model of `model_type` from `explicit_path` or the default directory.
    ///
    /// Errors from the loader itself are returned untouched.
    pub fn load_model(&self, model_type: &str, explicit_path: Option<&Path>) -> Result<L::Model> {
        let dir = self.checkpoint_dir(model_type, explicit_path, Artifact::Model)?;
        tracing::info!("Using local BERT model: {}", dir.display());
        self.loader.load_model_from_dir(&dir)
    }

    fn checkpoint_dir(
        &self,
        model_type: &str,
        explicit_path: Option<&Path>,
        artifact: Artifact,
    ) -> Result<PathBuf, LoadError> {
        let kind: ModelKind = model_type.parse()?;
        let dir = resolver::effective_path(explicit_path, &self.config);

        if !dir.is_dir() {
            return Err(LoadError::not_found(kind, artifact, &dir));
        }
        Ok(dir)
    }
}
