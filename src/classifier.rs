//! The sentiment scoring core.
//!
//! [`SentimentClassifier::classify`] is a pure function of the loaded
//! weights and the input text: tokenize to a fixed-length encoding, run the
//! encoder, apply the linear head, take the argmax.

use std::fmt;

use tracing::debug;

use crate::error::{IcebreakerError, Result};
use crate::model::{Encoder, LinearHead};
use crate::tokenizer::{SpecialTokenNames, TokenizerProvider};
use crate::types::{ClassificationResult, Label, SpecialTokens, TokenEncoding, validate_max_length};

/// Read-only classifier state: tokenizer, encoder and head, paired.
///
/// Built once at startup and shared behind an `Arc`. Nothing here changes
/// after construction, so calls may run from any number of threads.
pub struct SentimentClassifier {
    tokenizer: Box<dyn TokenizerProvider>,
    encoder: Box<dyn Encoder>,
    head: LinearHead,
    special: SpecialTokens,
    max_length: usize,
}

impl fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("encoder", &self.encoder.name())
            .field("hidden_size", &self.head.hidden_size())
            .field("special", &self.special)
            .field("max_length", &self.max_length)
            .finish()
    }
}

impl SentimentClassifier {
    /// Assemble a classifier from its parts.
    ///
    /// Checks that the tokenizer knows the special tokens, that its
    /// vocabulary matches the size the head was trained with (when the head
    /// declares one) and that `max_length` can hold `[CLS]` and `[SEP]`.
    /// The encoder's output width is checked by the bundle loader, which
    /// can afford a probe pass.
    pub fn new(
        tokenizer: Box<dyn TokenizerProvider>,
        encoder: Box<dyn Encoder>,
        head: LinearHead,
        special_tokens: &SpecialTokenNames,
        max_length: usize,
    ) -> Result<Self> {
        validate_max_length(max_length)?;
        let special = special_tokens.resolve(tokenizer.as_ref())?;

        if let Some(expected) = head.vocab_size() {
            let actual = tokenizer.vocab_size();
            if actual != expected {
                return Err(IcebreakerError::Configuration(format!(
                    "Tokenizer vocabulary has {actual} entries, head was trained with {expected}; \
                     tokenizer and model are not paired"
                )));
            }
        }

        Ok(Self {
            tokenizer,
            encoder,
            head,
            special,
            max_length,
        })
    }

    /// Tokenize `text` into the fixed-length encoding the encoder expects.
    ///
    /// Never fails on content: empty text yields `[CLS] [SEP]` plus padding,
    /// long text is cut at `max_length`.
    pub fn encode(&self, text: &str) -> Result<TokenEncoding> {
        let content = self.tokenizer.tokenize(text)?;
        TokenEncoding::build(&content, &self.special, self.max_length)
    }

    /// Score `text`.
    ///
    /// Errors are per-request `Inference` failures; there is no default
    /// label on failure.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let encoding = self.encode(text)?;
        self.classify_encoding(&encoding)
    }

    /// Score an already-built encoding.
    pub fn classify_encoding(&self, encoding: &TokenEncoding) -> Result<ClassificationResult> {
        if encoding.len() != self.max_length {
            return Err(IcebreakerError::Inference(format!(
                "encoding has {} tokens, classifier expects {}",
                encoding.len(),
                self.max_length
            )));
        }

        let embedding = self.encoder.encode(encoding)?;
        let logits = self.head.apply(&embedding)?;
        let result = ClassificationResult::from_logits(logits);

        debug!(
            tokens = encoding.real_tokens(),
            label = %result.label,
            confidence = result.confidence(),
            "classified"
        );
        Ok(result)
    }

    /// Run one forward pass on the empty input and check the encoder's
    /// output fits the head.
    ///
    /// Used at startup: any failure here is a configuration error, so a
    /// mismatched bundle never reaches request time.
    pub fn probe(&self) -> Result<ClassificationResult> {
        let encoding = self.encode("").map_err(into_configuration)?;
        let embedding = self.encoder.encode(&encoding).map_err(into_configuration)?;
        if embedding.dimensions() != self.head.hidden_size() {
            return Err(IcebreakerError::Configuration(format!(
                "Encoder {} produces {} dimensions, head expects {}",
                self.encoder.name(),
                embedding.dimensions(),
                self.head.hidden_size()
            )));
        }
        let logits = self.head.apply(&embedding).map_err(into_configuration)?;
        Ok(ClassificationResult::from_logits(logits))
    }

    /// Score `text` and return just the label.
    pub fn label(&self, text: &str) -> Result<Label> {
        Ok(self.classify(text)?.label)
    }

    /// Fixed sequence length in tokens.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Resolved special token ids.
    pub fn special_tokens(&self) -> SpecialTokens {
        self.special
    }

    /// Encoder output width expected by the head.
    pub fn hidden_size(&self) -> usize {
        self.head.hidden_size()
    }

    /// Encoder name for display.
    pub fn encoder_name(&self) -> &str {
        self.head.encoder().unwrap_or_else(|| self.encoder.name())
    }
}

fn into_configuration(err: IcebreakerError) -> IcebreakerError {
    match err {
        IcebreakerError::Configuration(_) => err,
        other => IcebreakerError::Configuration(format!("Model probe failed: {other}")),
    }
}
