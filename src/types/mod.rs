//! Public types for the Icebreaker API.

mod classification;
mod embedding;
mod encoding;
mod label;

pub use classification::ClassificationResult;
pub use embedding::Embedding;
pub use encoding::{
    DEFAULT_MAX_LENGTH, MIN_MAX_LENGTH, SpecialTokens, TokenEncoding, validate_max_length,
};
pub use label::{Label, UNAVAILABLE_MESSAGE};
