//! Async scoring facade with a bounded wait.
//!
//! The classifier itself is synchronous. [`ScoringService`] runs it on the
//! blocking pool so an async caller (a UI event handler, a request handler)
//! never waits longer than the configured timeout. A timed-out computation
//! is abandoned: it finishes in the background and its result is dropped.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{instrument, warn};

use crate::classifier::SentimentClassifier;
use crate::error::{IcebreakerError, Result};
use crate::telemetry;
use crate::types::ClassificationResult;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared entry point for scoring messages.
#[derive(Debug, Clone)]
pub struct ScoringService {
    classifier: Arc<SentimentClassifier>,
    timeout: Duration,
}

impl ScoringService {
    /// Wrap a loaded classifier.
    pub fn new(classifier: Arc<SentimentClassifier>, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Wrap a loaded classifier with [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn with_default_timeout(classifier: Arc<SentimentClassifier>) -> Self {
        Self::new(classifier, DEFAULT_REQUEST_TIMEOUT)
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &Arc<SentimentClassifier> {
        &self.classifier
    }

    /// Configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Score `text`, giving up after the configured timeout.
    ///
    /// Returns `Timeout` if the deadline passes and `Inference` if the
    /// worker fails; never a fallback label.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let classifier = Arc::clone(&self.classifier);
        let text = text.to_owned();

        let task = tokio::task::spawn_blocking(move || classifier.classify(&text));
        let result = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(IcebreakerError::Inference(format!(
                "classification worker failed: {join_err}"
            ))),
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "classification timed out");
                Err(IcebreakerError::Timeout(self.timeout))
            }
        };

        Self::record(&result, start);
        result
    }

    /// Record outcome metrics (counter + histogram).
    fn record(result: &Result<ClassificationResult>, start: Instant) {
        let (status, label) = match result {
            Ok(r) => ("ok", r.label.as_str()),
            Err(IcebreakerError::Timeout(_)) => ("timeout", "none"),
            Err(_) => ("error", "none"),
        };
        metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL,
            "status" => status,
            "label" => label,
        )
        .increment(1);
        metrics::histogram!(telemetry::CLASSIFY_DURATION_SECONDS,
            "status" => status,
        )
        .record(start.elapsed().as_secs_f64());
    }
}
