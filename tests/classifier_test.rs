//! Tests for the scoring core with mock tokenizer and encoder.

use icebreaker::{
    ClassificationResult, Embedding, Encoder, IcebreakerError, Label, LinearHead, Result,
    SentimentClassifier, SpecialTokenNames, TokenEncoding, TokenizerProvider,
};

// ============================================================================
// Mock components
// ============================================================================

/// Word-level tokenizer: each whitespace word gets a stable id from its bytes.
struct WordTokenizer;

impl TokenizerProvider for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text
            .to_lowercase()
            .split_whitespace()
            .map(|w| 1000 + w.bytes().fold(0_u32, |h, b| (h * 31 + b as u32) % 20_000))
            .collect())
    }

    fn token_id(&self, token: &str) -> Option<u32> {
        match token {
            "[PAD]" => Some(0),
            "[CLS]" => Some(101),
            "[SEP]" => Some(102),
            _ => None,
        }
    }

    fn vocab_size(&self) -> usize {
        21_000
    }
}

/// Deterministic encoder that only looks at unmasked positions.
///
/// Output: [real token count, mean id / 1000, id of first content token / 1000].
struct MaskedEncoder;

impl Encoder for MaskedEncoder {
    fn name(&self) -> &str {
        "masked-mock"
    }

    fn encode(&self, encoding: &TokenEncoding) -> Result<Embedding> {
        let real: Vec<f32> = encoding
            .input_ids()
            .iter()
            .zip(encoding.attention_mask())
            .filter(|(_, mask)| **mask == 1)
            .map(|(id, _)| *id as f32)
            .collect();
        let count = real.len() as f32;
        let mean = real.iter().sum::<f32>() / count / 1000.0;
        let first = real.get(1).copied().unwrap_or(0.0) / 1000.0;
        Ok(Embedding::new(vec![count, mean, first]))
    }
}

struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn name(&self) -> &str {
        "failing"
    }

    fn encode(&self, _encoding: &TokenEncoding) -> Result<Embedding> {
        Err(IcebreakerError::Inference("out of memory".to_string()))
    }
}

struct NanEncoder;

impl Encoder for NanEncoder {
    fn name(&self) -> &str {
        "nan"
    }

    fn encode(&self, _encoding: &TokenEncoding) -> Result<Embedding> {
        Ok(Embedding::new(vec![f32::NAN, 0.0, 0.0]))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Positive once there are at least two content words.
fn head() -> LinearHead {
    LinearHead::new([vec![0.0, 0.1, 0.0], vec![1.0, 0.1, 0.0]], [3.5, 0.0]).unwrap()
}

fn classifier_with(encoder: Box<dyn Encoder>, max_length: usize) -> SentimentClassifier {
    SentimentClassifier::new(
        Box::new(WordTokenizer),
        encoder,
        head(),
        &SpecialTokenNames::default(),
        max_length,
    )
    .unwrap()
}

fn classifier(max_length: usize) -> SentimentClassifier {
    classifier_with(Box::new(MaskedEncoder), max_length)
}

// ============================================================================
// Input handling
// ============================================================================

#[test]
fn empty_text_returns_label() {
    let result = classifier(128).classify("").unwrap();
    assert_eq!(result.label, Label::Negative);
}

#[test]
fn whitespace_only_scores_like_empty() {
    let c = classifier(128);
    let empty = c.classify("").unwrap();
    for text in [" ", "\t\n", "     "] {
        assert_eq!(c.classify(text).unwrap(), empty);
    }
}

#[test]
fn arbitrary_characters_are_accepted() {
    let c = classifier(16);
    for text in ["😀😀😀", "\u{0}\u{1}", "<script>", "ñandú über straße"] {
        assert!(c.classify(text).is_ok(), "failed on {text:?}");
    }
}

#[test]
fn greeting_scores_positive() {
    assert_eq!(
        classifier(128).label("Hi, how are you today?").unwrap(),
        Label::Positive
    );
}

// ============================================================================
// Fixed-length encoding
// ============================================================================

#[test]
fn encodings_have_fixed_length_and_matching_mask() {
    let c = classifier(10);
    let long = "word ".repeat(500);
    for text in ["", "one", "one two three", long.as_str()] {
        let enc = c.encode(text).unwrap();
        assert_eq!(enc.input_ids().len(), 10);
        assert_eq!(enc.attention_mask().len(), 10);

        let words = text.split_whitespace().count();
        assert_eq!(enc.real_tokens(), (words + 2).min(10));
    }
}

#[test]
fn padding_follows_real_tokens() {
    let enc = classifier(8).encode("a b").unwrap();
    assert_eq!(enc.attention_mask(), &[1, 1, 1, 1, 0, 0, 0, 0]);
    assert_eq!(enc.input_ids()[0], 101);
    assert_eq!(enc.input_ids()[3], 102);
    assert!(enc.input_ids()[4..].iter().all(|&id| id == 0));
}

#[test]
fn text_beyond_max_length_is_ignored() {
    let c = classifier(8);
    let base = "one two three four five six";
    let baseline = c.classify(base).unwrap();
    for suffix in [" seven", " seven eight nine ten", " anything at all goes here"] {
        let extended = format!("{base}{suffix}");
        assert_eq!(c.encode(&extended).unwrap(), c.encode(base).unwrap());
        assert_eq!(c.classify(&extended).unwrap(), baseline);
    }
}

// ============================================================================
// Determinism and label domain
// ============================================================================

#[test]
fn repeated_calls_are_bit_identical() {
    let c = classifier(32);
    let first = c.classify("Hi, how are you today?").unwrap();
    for _ in 0..10 {
        let again = c.classify("Hi, how are you today?").unwrap();
        assert_eq!(again.label, first.label);
        assert_eq!(again.logits.map(f32::to_bits), first.logits.map(f32::to_bits));
    }
}

#[test]
fn rebuilt_classifier_reproduces_scores() {
    let a = classifier(32).classify("hey there").unwrap();
    let b = classifier(32).classify("hey there").unwrap();
    assert_eq!(a.logits.map(f32::to_bits), b.logits.map(f32::to_bits));
}

#[test]
fn scores_are_two_element_and_label_in_domain() {
    let c = classifier(16);
    for text in ["", "hi", "hello there friend", "x y z w"] {
        let ClassificationResult {
            label,
            logits,
            probabilities,
        } = c.classify(text).unwrap();
        assert!(Label::ALL.contains(&label));
        assert_eq!(logits.len(), 2);
        assert!((probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn encoder_failure_is_reported_not_defaulted() {
    let c = classifier_with(Box::new(FailingEncoder), 16);
    let err = c.classify("hello").unwrap_err();
    assert!(matches!(err, IcebreakerError::Inference(_)));
    assert!(err.is_unavailable());
    assert!(c.label("hello").is_err());
}

#[test]
fn non_finite_scores_are_inference_errors() {
    let c = classifier_with(Box::new(NanEncoder), 16);
    let err = c.classify("hello").unwrap_err();
    assert!(matches!(err, IcebreakerError::Inference(_)));
}

#[test]
fn probe_surfaces_encoder_failure_as_configuration() {
    let c = classifier_with(Box::new(FailingEncoder), 16);
    let err = c.probe().unwrap_err();
    assert!(matches!(err, IcebreakerError::Configuration(_)));
    assert!(!err.is_unavailable());
}

#[test]
fn missing_special_tokens_fail_construction() {
    let names = SpecialTokenNames {
        sep: "</s>".to_string(),
        ..Default::default()
    };
    let err = SentimentClassifier::new(
        Box::new(WordTokenizer),
        Box::new(MaskedEncoder),
        head(),
        &names,
        16,
    )
    .unwrap_err();
    assert!(matches!(err, IcebreakerError::Configuration(_)));
}

#[test]
fn tiny_max_length_fails_construction() {
    let err = SentimentClassifier::new(
        Box::new(WordTokenizer),
        Box::new(MaskedEncoder),
        head(),
        &SpecialTokenNames::default(),
        1,
    )
    .unwrap_err();
    assert!(matches!(err, IcebreakerError::Configuration(_)));
}
