//! Startup loading of the model bundle.
//!
//! [`load_classifier`] is the one place the weights are read. It either
//! returns a fully checked classifier or a configuration error; there is no
//! partially initialized state to fall back on.

use std::time::Instant;

use tracing::info;

use super::{LinearHead, OnnxEncoder, OnnxEncoderOptions};
use crate::classifier::SentimentClassifier;
use crate::config::ModelConfig;
use crate::error::Result;
use crate::telemetry;
use crate::tokenizer::HfTokenizer;

/// Load tokenizer, encoder and head, check they belong together, and
/// return the classifier.
///
/// Blocking: may download from the Hub and builds an ONNX session.
pub fn load_classifier(config: &ModelConfig) -> Result<SentimentClassifier> {
    let start = Instant::now();
    config.validate()?;

    let source = config.source()?;
    let device = config.device()?;
    let paths = source.resolve(&config.files, config.cache_dir.as_deref())?;

    let tokenizer = HfTokenizer::from_file(&paths.tokenizer)?;
    let head = LinearHead::from_file(&paths.head)?;
    let encoder = OnnxEncoder::from_file(
        &paths.encoder,
        OnnxEncoderOptions {
            pooled_output: config.pooled_output.clone(),
            token_type_ids: config.token_type_ids,
            device,
        },
    )?;

    let classifier = SentimentClassifier::new(
        Box::new(tokenizer),
        Box::new(encoder),
        head,
        &config.tokens,
        config.max_length,
    )?;
    let baseline = classifier.probe()?;

    let elapsed = start.elapsed();
    metrics::histogram!(telemetry::MODEL_LOAD_DURATION_SECONDS).record(elapsed.as_secs_f64());
    info!(
        source = %source.describe(),
        device = %device,
        encoder = classifier.encoder_name(),
        hidden_size = classifier.hidden_size(),
        max_length = classifier.max_length(),
        empty_input_label = %baseline.label,
        elapsed_ms = elapsed.as_millis() as u64,
        "classifier loaded"
    );

    Ok(classifier)
}
