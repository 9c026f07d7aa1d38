//! Metric names.
//!
//! Emitted through the `metrics` facade. Nothing is recorded unless the
//! embedding application installs a recorder.
//!
//! Labels on the request metrics:
//! - `status`: "ok", "error" or "timeout"
//! - `label`: "POSITIVE" or "NEGATIVE", "none" when no label was produced

/// Total classification requests handled by the scoring service.
///
/// Labels: `status`, `label`.
pub const CLASSIFICATIONS_TOTAL: &str = "icebreaker_classifications_total";

/// Classification duration in seconds, timeouts included.
///
/// Labels: `status`.
pub const CLASSIFY_DURATION_SECONDS: &str = "icebreaker_classify_duration_seconds";

/// Time to load and verify the model bundle at startup.
pub const MODEL_LOAD_DURATION_SECONDS: &str = "icebreaker_model_load_duration_seconds";
