//! Metrics collection.
//!
//! # Metrics
//! - `certificate_operations_total` (counter): gateway operations by name, outcome
//! - `certificate_operation_duration_seconds` (histogram): gateway latency
//! - `document_upload_bytes` (histogram): size of pinned documents
//! - `search_fetch_failures_total` (counter): per-id fetches dropped from a search
//!
//! # Design Decisions
//! - Uses the `metrics` facade; installing a recorder/exporter is left to the
//!   embedding application, updates are no-ops without one

use std::time::Instant;

/// Record a finished gateway operation.
pub fn record_operation(operation: &'static str, success: bool, started: Instant) {
    let outcome = if success { "success" } else { "error" };
    metrics::counter!(
        "certificate_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "certificate_operation_duration_seconds",
        "operation" => operation
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record the size of a pinned document.
pub fn record_upload_bytes(bytes: u64) {
    metrics::histogram!("document_upload_bytes").record(bytes as f64);
}

/// Record a certificate dropped from search results.
pub fn record_search_fetch_failure() {
    metrics::counter!("search_fetch_failures_total").increment(1);
}
