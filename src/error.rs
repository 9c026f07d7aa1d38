//! Icebreaker error types

use std::time::Duration;

/// Icebreaker error types
#[derive(Debug, thiserror::Error)]
pub enum IcebreakerError {
    /// The model bundle could not be loaded, or its parts do not fit together
    /// (tokenizer/encoder/head mismatch, missing files, bad settings).
    ///
    /// Raised at startup only. A classifier is never constructed after one.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A request failed while running the model (runtime fault, non-finite
    /// scores, wrong embedding width).
    #[error("inference error: {0}")]
    Inference(String),

    #[error("classification timed out after {0:?}")]
    Timeout(Duration),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IcebreakerError {
    /// Whether this is a per-request failure that the caller should report as
    /// "could not evaluate" rather than a broken deployment.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Inference(_) | Self::Timeout(_))
    }
}

/// Result type alias for Icebreaker operations
pub type Result<T> = std::result::Result<T, IcebreakerError>;
