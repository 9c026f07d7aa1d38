//! Response-likelihood labels.
//!
//! The classifier answers one question about an opening message: is the
//! match likely to reply? `Positive` means yes, `Negative` means the message
//! is likely to be ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message shown when a message could not be scored.
///
/// Callers display this instead of any label when classification fails,
/// so a stale or made-up verdict never reaches the user.
pub const UNAVAILABLE_MESSAGE: &str = "Could not evaluate this message right now.";

/// The predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    /// Likely to be ignored. Row 0 of the linear head.
    Negative,
    /// Likely to get a response. Row 1 of the linear head.
    Positive,
}

impl Label {
    /// Both labels in head row order.
    pub const ALL: [Label; 2] = [Label::Negative, Label::Positive];

    /// Pick the label with the higher score.
    ///
    /// `scores` is `[negative, positive]`. On ties `Negative` wins, which is
    /// also what a first-index argmax gives.
    pub fn from_scores(scores: [f32; 2]) -> Self {
        let [negative, positive] = scores;
        if positive > negative {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Row index of this label in the head weights.
    pub fn index(self) -> usize {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }

    /// Stable upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Negative => "NEGATIVE",
            Label::Positive => "POSITIVE",
        }
    }

    /// Verdict text for display next to the message box.
    pub fn message(self) -> &'static str {
        match self {
            Label::Positive => "Congratulations, you will likely get a response!",
            Label::Negative => "Sorry, better luck next time...you have been ignored :(",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_scores_positive() {
        assert_eq!(Label::from_scores([-0.3, 1.2]), Label::Positive);
    }

    #[test]
    fn from_scores_negative() {
        assert_eq!(Label::from_scores([2.0, -1.0]), Label::Negative);
    }

    #[test]
    fn from_scores_tie_favors_negative() {
        assert_eq!(Label::from_scores([0.5, 0.5]), Label::Negative);
        assert_eq!(Label::from_scores([0.0, -0.0]), Label::Negative);
    }

    #[test]
    fn index_matches_row_order() {
        for (i, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
    }

    #[test]
    fn serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&Label::Positive).unwrap(),
            "\"POSITIVE\""
        );
        let label: Label = serde_json::from_str("\"NEGATIVE\"").unwrap();
        assert_eq!(label, Label::Negative);
    }
}
