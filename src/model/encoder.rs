//! Encoder seam.

use crate::error::Result;
use crate::types::{Embedding, TokenEncoding};

/// A pretrained text encoder producing one pooled vector per sequence.
///
/// Implementations hold read-only weights. `encode` must be deterministic
/// for a given encoding and must not mutate shared state observable to
/// other calls.
pub trait Encoder: Send + Sync {
    /// Encoder name for logging/debugging.
    fn name(&self) -> &str;

    /// Run the forward pass and return the pooled representation.
    fn encode(&self, encoding: &TokenEncoding) -> Result<Embedding>;
}
