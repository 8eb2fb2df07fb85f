//! Metrics collection.
//!
//! # Metrics
//! - `keymanager_query_attempts_total` (counter): read attempts by method, outcome
//! - `keymanager_query_failures_total` (counter): reads that spent their budget
//! - `keymanager_writes_total` (counter): writes by method, outcome
//!
//! No recorder is installed here; the embedding application decides where
//! metrics go. Without a recorder every call is a no-op.

/// Record a single read attempt.
pub fn record_query_attempt(method: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "fault" };
    metrics::counter!(
        "keymanager_query_attempts_total",
        "method" => method,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a read that exhausted its retry budget.
pub fn record_query_failure(method: &'static str) {
    metrics::counter!("keymanager_query_failures_total", "method" => method).increment(1);
}

/// Record the outcome of a write.
pub fn record_write(method: &'static str, outcome: &'static str) {
    metrics::counter!(
        "keymanager_writes_total",
        "method" => method,
        "outcome" => outcome
    )
    .increment(1);
}
