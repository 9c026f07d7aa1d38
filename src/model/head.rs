//! Linear classification head.
//!
//! Maps the encoder's pooled output to one score per label:
//! `scores[i] = weight[i] · embedding + bias[i]`, row 0 = `Negative`,
//! row 1 = `Positive`. Loaded once from `head.json` and never mutated.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IcebreakerError, Result};
use crate::types::Embedding;

/// On-disk form of the head (`head.json`).
///
/// ```json
/// {
///   "encoder": "bert-base-uncased",
///   "hidden_size": 768,
///   "vocab_size": 30522,
///   "weight": [[...768 floats...], [...768 floats...]],
///   "bias": [0.01, -0.01]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadArtifact {
    /// Two rows, one per label.
    pub weight: Vec<Vec<f32>>,
    /// One bias per label.
    pub bias: Vec<f32>,
    /// Encoder output width the head was trained against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_size: Option<usize>,
    /// Vocabulary size of the paired tokenizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab_size: Option<usize>,
    /// Name of the pretrained encoder, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<String>,
}

/// Validated two-class linear head.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearHead {
    weight: [Vec<f32>; 2],
    bias: [f32; 2],
    vocab_size: Option<usize>,
    encoder: Option<String>,
}

impl LinearHead {
    /// Create a head from raw parameters.
    pub fn new(weight: [Vec<f32>; 2], bias: [f32; 2]) -> Result<Self> {
        let width = weight[0].len();
        if width == 0 {
            return Err(config_error("weight rows are empty"));
        }
        if weight[1].len() != width {
            return Err(config_error(format!(
                "weight rows differ in length ({} vs {})",
                width,
                weight[1].len()
            )));
        }
        let finite = weight
            .iter()
            .flatten()
            .chain(bias.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(config_error("parameters contain non-finite values"));
        }

        Ok(Self {
            weight,
            bias,
            vocab_size: None,
            encoder: None,
        })
    }

    /// Validate an artifact and build the head from it.
    pub fn from_artifact(artifact: HeadArtifact) -> Result<Self> {
        let HeadArtifact {
            weight,
            bias,
            hidden_size,
            vocab_size,
            encoder,
        } = artifact;

        let weight: [Vec<f32>; 2] = weight.try_into().map_err(|rows: Vec<Vec<f32>>| {
            config_error(format!("expected 2 weight rows, got {}", rows.len()))
        })?;
        let bias: [f32; 2] = bias.try_into().map_err(|b: Vec<f32>| {
            config_error(format!("expected 2 bias values, got {}", b.len()))
        })?;

        let mut head = Self::new(weight, bias)?;
        if let Some(declared) = hidden_size {
            if declared != head.hidden_size() {
                return Err(config_error(format!(
                    "declared hidden_size {} but rows have length {}",
                    declared,
                    head.hidden_size()
                )));
            }
        }
        head.vocab_size = vocab_size;
        head.encoder = encoder;
        Ok(head)
    }

    /// Load and validate `head.json`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to read head file {path:?}: {e}"))
        })?;
        let artifact: HeadArtifact = serde_json::from_str(&content).map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to parse head file {path:?}: {e}"))
        })?;
        Self::from_artifact(artifact)
    }

    /// Input width (the encoder's output dimension).
    pub fn hidden_size(&self) -> usize {
        self.weight[0].len()
    }

    /// Vocabulary size declared by the artifact, if any.
    pub fn vocab_size(&self) -> Option<usize> {
        self.vocab_size
    }

    /// Encoder name declared by the artifact, if any.
    pub fn encoder(&self) -> Option<&str> {
        self.encoder.as_deref()
    }

    /// Score an embedding. Returns `[negative, positive]`.
    pub fn apply(&self, embedding: &Embedding) -> Result<[f32; 2]> {
        if embedding.dimensions() != self.hidden_size() {
            return Err(IcebreakerError::Inference(format!(
                "embedding has {} dimensions, head expects {}",
                embedding.dimensions(),
                self.hidden_size()
            )));
        }

        let scores = [0_usize, 1].map(|row| {
            self.weight[row]
                .iter()
                .zip(embedding.values())
                .map(|(w, x)| w * x)
                .sum::<f32>()
                + self.bias[row]
        });

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(IcebreakerError::Inference(format!(
                "non-finite scores {scores:?}"
            )));
        }
        Ok(scores)
    }
}

fn config_error(msg: impl std::fmt::Display) -> IcebreakerError {
    IcebreakerError::Configuration(format!("Invalid classification head: {msg}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head() -> LinearHead {
        LinearHead::new([vec![1.0, 0.0, -1.0], vec![0.0, 2.0, 0.5]], [0.1, -0.1]).unwrap()
    }

    #[test]
    fn apply_computes_affine_map() {
        let scores = head().apply(&Embedding::new(vec![1.0, 2.0, 3.0])).unwrap();
        assert!((scores[0] - (1.0 - 3.0 + 0.1)).abs() < 1e-6);
        assert!((scores[1] - (4.0 + 1.5 - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn apply_rejects_wrong_width() {
        let err = head().apply(&Embedding::new(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, IcebreakerError::Inference(_)));
    }

    #[test]
    fn apply_rejects_non_finite_output() {
        let err = head()
            .apply(&Embedding::new(vec![f32::NAN, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, IcebreakerError::Inference(_)));
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = LinearHead::new([vec![1.0, 2.0], vec![1.0]], [0.0, 0.0]).unwrap_err();
        assert!(matches!(err, IcebreakerError::Configuration(_)));
    }

    #[test]
    fn new_rejects_empty_rows() {
        assert!(LinearHead::new([vec![], vec![]], [0.0, 0.0]).is_err());
    }

    #[test]
    fn new_rejects_nan_weights() {
        assert!(LinearHead::new([vec![f32::NAN], vec![1.0]], [0.0, 0.0]).is_err());
    }

    #[test]
    fn artifact_needs_two_rows() {
        let artifact = HeadArtifact {
            weight: vec![vec![1.0], vec![1.0], vec![1.0]],
            bias: vec![0.0, 0.0],
            hidden_size: None,
            vocab_size: None,
            encoder: None,
        };
        let err = LinearHead::from_artifact(artifact).unwrap_err();
        assert!(err.to_string().contains("expected 2 weight rows, got 3"));
    }

    #[test]
    fn artifact_checks_declared_hidden_size() {
        let artifact = HeadArtifact {
            weight: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            bias: vec![0.0, 0.0],
            hidden_size: Some(768),
            vocab_size: None,
            encoder: None,
        };
        assert!(LinearHead::from_artifact(artifact).is_err());
    }

    #[test]
    fn artifact_keeps_metadata() {
        let artifact: HeadArtifact = serde_json::from_str(
            r#"{
                "encoder": "bert-base-uncased",
                "hidden_size": 2,
                "vocab_size": 30522,
                "weight": [[1.0, 2.0], [3.0, 4.0]],
                "bias": [0.5, -0.5]
            }"#,
        )
        .unwrap();
        let head = LinearHead::from_artifact(artifact).unwrap();
        assert_eq!(head.hidden_size(), 2);
        assert_eq!(head.vocab_size(), Some(30522));
        assert_eq!(head.encoder(), Some("bert-base-uncased"));
    }
}
