//! bert-local
//!
//! Resolve a local `bert-base-uncased` checkpoint directory and load its
//! tokenizer and encoder without any network access.
//!
//! # Where the checkpoint is looked for
//!
//! 1. An explicit path passed to the load call
//! 2. `BERT_BASE_UNCASED_PATH`, when set and non-empty
//! 3. `<nearest third_party ancestor>/bert-base-uncased`
//! 4. `<current dir>/third_party/bert-base-uncased`
//!
//! The directory must already hold a checkpoint saved by the Hugging Face
//! libraries (`config.json`, `model.safetensors` or `pytorch_model.bin`,
//! and `tokenizer.json` or `vocab.txt`). Nothing is ever downloaded.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bert_local::{load_model, load_tokenizer};
//!
//! fn main() -> anyhow::Result<()> {
//!     let tokenizer = load_tokenizer("bert-base-uncased", None)?;
//!     let model = load_model("bert-base-uncased", None)?;
//!
//!     let encoding = tokenizer.encode("a cat sitting on a couch")?;
//!     let cls = model.embed(&encoding)?;
//!     println!("{} dims", cls.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom configuration
//!
//! Use [`CheckpointLocator`] with an explicit [`LoaderConfig`] to control the
//! lookup without touching the process environment, or plug in another
//! [`CheckpointLoader`].
//!
//! ```rust,ignore
//! use bert_local::{CheckpointLocator, LoaderConfig};
//!
//! let config = LoaderConfig::new("/srv/detector/src", "/srv/detector")
//!     .with_override(Some("/models/bert-base-uncased"));
//! let locator = CheckpointLocator::local(config);
//! let model = locator.load_model("bert-base-uncased", None)?;
//! ```

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod resolver;

use std::path::{Path, PathBuf};

pub use checkpoint::CheckpointLocator;
pub use config::{LoaderConfig, CHECKPOINT_DIR, ENV_OVERRIDE, MARKER_DIR};
pub use error::{Artifact, LoadError};
pub use model::{
    BertEncoder, BertTokenizer, CheckpointLoader, CheckpointMetadata, LocalCheckpointLoader,
    ModelKind,
};

/// Default checkpoint directory for the running process.
///
/// See the crate docs for the lookup order. The directory is not checked.
pub fn resolve_default_path() -> PathBuf {
    resolver::resolve_default_path(&LoaderConfig::from_env())
}

/// Load a tokenizer from a local checkpoint.
///
/// # Arguments
///
/// * `model_type` - Model identifier; only `"bert-base-uncased"` is accepted
/// * `explicit_path` - Checkpoint directory; `None` or empty uses [`resolve_default_path`]
///
/// # Errors
///
/// [`LoadError::UnsupportedModelKind`] for any other identifier,
/// [`LoadError::ModelNotFound`] when the directory does not exist. Failures
/// while reading the checkpoint are returned as the tokenizer backend reports them.
pub fn load_tokenizer(
    model_type: &str,
    explicit_path: Option<&Path>,
) -> anyhow::Result<BertTokenizer> {
    CheckpointLocator::local(LoaderConfig::from_env()).load_tokenizer(model_type, explicit_path)
}

/// Load the BERT encoder from a local checkpoint.
///
/// Same lookup and errors as [`load_tokenizer`].
pub fn load_model(model_type: &str, explicit_path: Option<&Path>) -> anyhow::Result<BertEncoder> {
    CheckpointLocator::local(LoaderConfig::from_env()).load_model(model_type, explicit_path)
}
