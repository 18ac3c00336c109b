use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokenizers::decoders::wordpiece::WordPiece as WordPieceDecoder;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{AddedToken, Encoding, PaddingParams, PaddingStrategy, Tokenizer};

const TOKENIZER_JSON: &str = "tokenizer.json";
const VOCAB_TXT: &str = "vocab.txt";
const TOKENIZER_CONFIG: &str = "tokenizer_config.json";

const CLS_TOKEN: &str = "[CLS]";
const SEP_TOKEN: &str = "[SEP]";
const PAD_TOKEN: &str = "[PAD]";
const UNK_TOKEN: &str = "[UNK]";
const MASK_TOKEN: &str = "[MASK]";

/// Subset of `tokenizer_config.json` that shapes a vocab-only pipeline.
#[derive(Debug, Deserialize)]
struct TokenizerConfig {
    #[serde(default = "default_lower_case")]
    do_lower_case: bool,
    #[serde(default)]
    tokenize_chinese_chars: Option<bool>,
    #[serde(default)]
    strip_accents: Option<bool>,
}

fn default_lower_case() -> bool {
    true
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            do_lower_case: default_lower_case(),
            tokenize_chinese_chars: None,
            strip_accents: None,
        }
    }
}

pub struct BertTokenizer {
    inner: Tokenizer,
    cls_token_id: u32,
    sep_token_id: u32,
    pad_token_id: u32,
}

impl BertTokenizer {
    /// Load from a saved checkpoint directory.
    ///
    /// `tokenizer.json` is used when present. Otherwise a WordPiece pipeline
    /// is assembled from `vocab.txt`, honouring `tokenizer_config.json`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let json_path = dir.join(TOKENIZER_JSON);
        let vocab_path = dir.join(VOCAB_TXT);

        let inner = if json_path.is_file() {
            tracing::debug!("Loading tokenizer from {:?}", json_path);
            Tokenizer::from_file(&json_path)
                .map_err(|e| anyhow::anyhow!("Failed to load tokenizer {:?}: {}", json_path, e))?
        } else if vocab_path.is_file() {
            tracing::debug!("No {}, building WordPiece from {:?}", TOKENIZER_JSON, vocab_path);
            let config = read_tokenizer_config(dir)?;
            build_from_vocab(&vocab_path, &config)?
        } else {
            anyhow::bail!(
                "No {} or {} in {:?}",
                TOKENIZER_JSON,
                VOCAB_TXT,
                dir
            );
        };

        Self::from_tokenizer(inner)
    }

    fn from_tokenizer(mut inner: Tokenizer) -> Result<Self> {
        let lookup = |token: &str| {
            inner
                .token_to_id(token)
                .with_context(|| format!("Vocabulary has no {} token", token))
        };
        let cls_token_id = lookup(CLS_TOKEN)?;
        let sep_token_id = lookup(SEP_TOKEN)?;
        let pad_token_id = lookup(PAD_TOKEN)?;

        if let Some(pp) = inner.get_padding_mut() {
            pp.strategy = PaddingStrategy::BatchLongest;
        } else {
            inner.with_padding(Some(PaddingParams {
                strategy: PaddingStrategy::BatchLongest,
                pad_id: pad_token_id,
                pad_token: PAD_TOKEN.to_string(),
                ..Default::default()
            }));
        }

        tracing::info!(
            "Loaded tokenizer, vocab={}, CLS={}, SEP={}",
            inner.get_vocab_size(true),
            cls_token_id,
            sep_token_id
        );

        Ok(Self {
            inner,
            cls_token_id,
            sep_token_id,
            pad_token_id,
        })
    }

    pub fn encode(&self, text: &str) -> Result<Encoding> {
        self.inner
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Encode failed: {}", e))
    }

    /// Encode several texts, padded to the longest one.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Encoding>> {
        self.inner
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Batch encode failed: {}", e))
    }

    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        self.inner
            .decode(ids, skip_special_tokens)
            .map_err(|e| anyhow::anyhow!("Decode failed: {}", e))
    }

    /// Size of the model vocabulary, excluding added tokens.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(false)
    }

    pub fn cls_token_id(&self) -> u32 {
        self.cls_token_id
    }

    pub fn sep_token_id(&self) -> u32 {
        self.sep_token_id
    }

    pub fn pad_token_id(&self) -> u32 {
        self.pad_token_id
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }
}

fn read_tokenizer_config(dir: &Path) -> Result<TokenizerConfig> {
    let path = dir.join(TOKENIZER_CONFIG);
    if !path.is_file() {
        return Ok(TokenizerConfig::default());
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {:?}", path))
}

fn build_from_vocab(vocab_path: &Path, config: &TokenizerConfig) -> Result<Tokenizer> {
    let vocab = vocab_path
        .to_str()
        .with_context(|| format!("Vocabulary path is not UTF-8: {:?}", vocab_path))?;

    let wordpiece = WordPiece::from_file(vocab)
        .unk_token(UNK_TOKEN.to_string())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to read vocabulary {:?}: {}", vocab_path, e))?;

    let mut tokenizer = Tokenizer::new(wordpiece);

    let id = |token: &str| {
        tokenizer
            .token_to_id(token)
            .with_context(|| format!("{:?} has no {} token", vocab_path, token))
    };
    let cls = id(CLS_TOKEN)?;
    let sep = id(SEP_TOKEN)?;

    tokenizer
        .with_normalizer(Some(BertNormalizer::new(
            true,
            config.tokenize_chinese_chars.unwrap_or(true),
            config.strip_accents,
            config.do_lower_case,
        )))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(BertProcessing::new(
            (SEP_TOKEN.to_string(), sep),
            (CLS_TOKEN.to_string(), cls),
        )))
        .with_decoder(Some(WordPieceDecoder::default()));

    let specials: Vec<AddedToken> = [PAD_TOKEN, UNK_TOKEN, CLS_TOKEN, SEP_TOKEN, MASK_TOKEN]
        .into_iter()
        .filter(|token| tokenizer.token_to_id(token).is_some())
        .map(|token| AddedToken::from(token, true))
        .collect();
    tokenizer.add_special_tokens(&specials);

    Ok(tokenizer)
}
