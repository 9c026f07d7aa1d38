//! HuggingFace tokenizers implementation.

use super::TokenizerProvider;
use crate::error::{IcebreakerError, Result};
use std::path::Path;

/// HuggingFace tokenizers implementation.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load tokenizer from a local `tokenizer.json`.
    ///
    /// Truncation and padding stored in the file are switched off; the
    /// classifier applies its own fixed-length policy.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            IcebreakerError::Configuration(format!(
                "Failed to load tokenizer from {:?}: {}",
                path, e
            ))
        })?;

        inner.with_truncation(None).map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to disable truncation: {}", e))
        })?;
        inner.with_padding(None);

        Ok(Self { inner })
    }
}

impl TokenizerProvider for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| IcebreakerError::Inference(format!("Tokenization failed: {}", e)))?;

        Ok(encoding.get_ids().to_vec())
    }

    fn token_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}
