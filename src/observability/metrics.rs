//! Client-side counters.
//!
//! # Metrics
//! - `client_fetch_attempts_total` (counter): every fetch attempt, by resource
//! - `client_fetch_outcomes_total` (counter): settled cycles, by resource and
//!   outcome (success, exhausted, superseded)
//! - `client_notifications_total` (counter): notifications shown, by kind
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.

pub fn record_fetch_attempt(resource: &str) {
    metrics::counter!("client_fetch_attempts_total", "resource" => resource.to_string()).increment(1);
}

pub fn record_fetch_outcome(resource: &str, outcome: &'static str) {
    metrics::counter!(
        "client_fetch_outcomes_total",
        "resource" => resource.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_notification(kind: &'static str) {
    metrics::counter!("client_notifications_total", "kind" => kind).increment(1);
}
