//! Icebreaker - predicts whether a dating-app opening line gets a reply
//!
//! A fine-tuned BERT encoder and a two-row linear head score a message as
//! `Positive` (likely to get a response) or `Negative` (likely ignored).
//! The weights are loaded once at startup and shared read-only; each call
//! is an independent, deterministic function of the text.
//!
//! # Example (requires `local-inference` feature)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use icebreaker::{Config, ScoringService, load_classifier};
//!
//! #[tokio::main]
//! async fn main() -> icebreaker::Result<()> {
//!     let config = Config::load(None)?;
//!     let classifier = Arc::new(load_classifier(&config.model)?);
//!     let service = ScoringService::new(classifier, config.limits.request_timeout());
//!
//!     let result = service.classify("Hi, how are you today?").await?;
//!     println!("{} ({:.2})", result.label.message(), result.confidence());
//!     Ok(())
//! }
//! ```
//!
//! # Testing with mock components
//!
//! [`SentimentClassifier::new`] takes any [`TokenizerProvider`] and
//! [`Encoder`], so the scoring path can be exercised without model files.

pub mod classifier;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod telemetry;
pub mod tokenizer;
pub mod types;
mod version;

// Re-export main types at crate root
pub use classifier::SentimentClassifier;
pub use config::Config;
pub use error::{IcebreakerError, Result};
pub use service::ScoringService;
pub use version::{BuildInfo, GIT_BRANCH, GIT_SHA, PKG_VERSION, version_string};

pub use model::{Device, Encoder, HeadArtifact, LinearHead, ModelSource};
pub use tokenizer::{SpecialTokenNames, TokenizerProvider};

#[cfg(feature = "local-inference")]
pub use model::{OnnxEncoder, load_classifier};
#[cfg(feature = "local-inference")]
pub use tokenizer::HfTokenizer;

// Re-export all types
pub use types::{
    ClassificationResult, Embedding, Label, SpecialTokens, TokenEncoding, UNAVAILABLE_MESSAGE,
};
