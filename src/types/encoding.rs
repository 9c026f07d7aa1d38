//! Fixed-length token encodings.
//!
//! The encoder only accepts sequences of one configured length. Every input
//! is laid out as `[CLS] content [SEP]` followed by `[PAD]` up to that
//! length, with content cut off once the sequence is full.

use serde::{Deserialize, Serialize};

use crate::error::{IcebreakerError, Result};

/// Default sequence length in tokens.
pub const DEFAULT_MAX_LENGTH: usize = 128;

/// Smallest usable sequence length: room for `[CLS]` and `[SEP]`.
pub const MIN_MAX_LENGTH: usize = 2;

/// Ids of the special tokens that frame every sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    /// Sequence start (`[CLS]` for BERT).
    pub cls: u32,
    /// Sequence end (`[SEP]` for BERT).
    pub sep: u32,
    /// Padding (`[PAD]` for BERT).
    pub pad: u32,
}

impl SpecialTokens {
    /// Ids used by `bert-base-uncased`.
    pub const BERT_UNCASED: SpecialTokens = SpecialTokens {
        cls: 101,
        sep: 102,
        pad: 0,
    };
}

/// Token ids plus attention mask, both exactly `max_length` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEncoding {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
}

impl TokenEncoding {
    /// Frame, truncate and pad `content_ids` to exactly `max_length` tokens.
    ///
    /// `content_ids` must not already contain special tokens. At most
    /// `max_length - 2` of them are kept.
    pub fn build(content_ids: &[u32], special: &SpecialTokens, max_length: usize) -> Result<Self> {
        validate_max_length(max_length)?;

        let kept = content_ids.len().min(max_length - MIN_MAX_LENGTH);
        let real = kept + MIN_MAX_LENGTH;

        let mut input_ids = Vec::with_capacity(max_length);
        input_ids.push(i64::from(special.cls));
        input_ids.extend(content_ids[..kept].iter().map(|&id| i64::from(id)));
        input_ids.push(i64::from(special.sep));
        input_ids.resize(max_length, i64::from(special.pad));

        let mut attention_mask = vec![1_i64; real];
        attention_mask.resize(max_length, 0);

        Ok(Self {
            input_ids,
            attention_mask,
        })
    }

    /// Token ids, length `max_length`.
    pub fn input_ids(&self) -> &[i64] {
        &self.input_ids
    }

    /// Attention mask, 1 for real tokens and 0 for padding.
    pub fn attention_mask(&self) -> &[i64] {
        &self.attention_mask
    }

    /// Segment ids. Single-sentence input, so all zero.
    pub fn token_type_ids(&self) -> Vec<i64> {
        vec![0; self.input_ids.len()]
    }

    /// Sequence length (the configured max length).
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Always false; an encoding holds at least `[CLS]` and `[SEP]`.
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of real tokens, special tokens included.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

/// Reject lengths that cannot hold the two framing tokens.
pub fn validate_max_length(max_length: usize) -> Result<()> {
    if max_length < MIN_MAX_LENGTH {
        return Err(IcebreakerError::Configuration(format!(
            "max_length must be at least {MIN_MAX_LENGTH}, got {max_length}"
        )));
    }
    Ok(())
}
