//! Classification results.

use serde::{Deserialize, Serialize};

use super::Label;

/// Outcome of scoring one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The label with the higher score (ties go to `Negative`).
    pub label: Label,
    /// Raw head output, `[negative, positive]`.
    pub logits: [f32; 2],
    /// Softmax of `logits`, same order.
    pub probabilities: [f32; 2],
}

impl ClassificationResult {
    /// Build a result from raw head output.
    pub fn from_logits(logits: [f32; 2]) -> Self {
        Self {
            label: Label::from_scores(logits),
            logits,
            probabilities: softmax(logits),
        }
    }

    /// Probability assigned to `label`.
    pub fn probability(&self, label: Label) -> f32 {
        self.probabilities[label.index()]
    }

    /// Probability of the chosen label.
    pub fn confidence(&self) -> f32 {
        self.probability(self.label)
    }
}

fn softmax(logits: [f32; 2]) -> [f32; 2] {
    let max = logits[0].max(logits[1]);
    let exps = logits.map(|x| (x - max).exp());
    let sum: f32 = exps.iter().sum();
    exps.map(|x| x / sum)
}
