//! Errors raised before any checkpoint is read.
//!
//! Failures inside the tokenizer or model backends are not listed here; they
//! reach the caller as the backend produced them.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::ModelKind;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The requested model identifier is not one this crate knows.
    #[error("only a local bert-base-uncased checkpoint is supported, requested: {0}")]
    UnsupportedModelKind(String),

    /// The effective checkpoint path is not an existing directory.
    #[error(
        "local BERT checkpoint not found: {}\n\
         Download the checkpoint to that path, for example with:\n\
         {}",
        .path.display(),
        .download_hint
    )]
    ModelNotFound {
        path: PathBuf,
        download_hint: String,
    },
}

/// What a missing-checkpoint error should tell the operator to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    Tokenizer,
    Model,
}

impl Artifact {
    fn python_class(self) -> &'static str {
        match self {
            Artifact::Tokenizer => "AutoTokenizer",
            Artifact::Model => "BertModel",
        }
    }
}

impl LoadError {
    pub fn unsupported(model_type: impl Into<String>) -> Self {
        Self::UnsupportedModelKind(model_type.into())
    }

    pub fn not_found(kind: ModelKind, artifact: Artifact, path: &Path) -> Self {
        let class = artifact.python_class();
        let download_hint = format!(
            "python -c \"from transformers import {class}; \
             {class}.from_pretrained('{id}').save_pretrained('{path}')\"",
            id = kind.id(),
            path = path.display(),
        );
        Self::ModelNotFound {
            path: path.to_path_buf(),
            download_hint,
        }
    }
}
