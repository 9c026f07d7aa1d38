//! Tokenization for the classifier.
//!
//! The tokenizer must be the one the weights were trained with. It turns
//! text into content token ids only; framing, truncation and padding to the
//! fixed sequence length happen in [`TokenEncoding::build`](crate::types::TokenEncoding::build)
//! so the length invariant does not depend on settings baked into a
//! tokenizer file.

#[cfg(feature = "local-inference")]
mod hf;

#[cfg(feature = "local-inference")]
pub use hf::HfTokenizer;

use serde::Deserialize;

use crate::error::{IcebreakerError, Result};
use crate::types::SpecialTokens;

/// Trait for tokenizer implementations, allowing mock tokenizers in tests.
pub trait TokenizerProvider: Send + Sync {
    /// Tokenize text into content token IDs, without special tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<u32>>;

    /// Look up the ID of a single token string.
    fn token_id(&self, token: &str) -> Option<u32>;

    /// Vocabulary size, added tokens included.
    fn vocab_size(&self) -> usize;
}

/// Token strings for the special tokens, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecialTokenNames {
    #[serde(default = "default_cls")]
    pub cls: String,
    #[serde(default = "default_sep")]
    pub sep: String,
    #[serde(default = "default_pad")]
    pub pad: String,
}

impl Default for SpecialTokenNames {
    fn default() -> Self {
        Self {
            cls: default_cls(),
            sep: default_sep(),
            pad: default_pad(),
        }
    }
}

fn default_cls() -> String {
    "[CLS]".to_string()
}

fn default_sep() -> String {
    "[SEP]".to_string()
}

fn default_pad() -> String {
    "[PAD]".to_string()
}

impl SpecialTokenNames {
    /// Resolve the names against a tokenizer's vocabulary.
    ///
    /// A missing token means the tokenizer does not belong to this model.
    pub fn resolve(&self, tokenizer: &dyn TokenizerProvider) -> Result<SpecialTokens> {
        let lookup = |name: &str| {
            tokenizer.token_id(name).ok_or_else(|| {
                IcebreakerError::Configuration(format!(
                    "Tokenizer has no special token {name:?}; tokenizer and model are not paired"
                ))
            })
        };

        Ok(SpecialTokens {
            cls: lookup(&self.cls)?,
            sep: lookup(&self.sep)?,
            pad: lookup(&self.pad)?,
        })
    }
}
