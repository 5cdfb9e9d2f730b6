//! Pipeline metrics boundary contract (counters + timings).
//!
//! These measure the monitoring pipeline itself. Model metrics and data
//! summaries travel through [`crate::RecordSinkPort`] instead.

use std::collections::BTreeMap;

/// Metric tags. Keep tags low-cardinality.
pub type MetricTags = BTreeMap<Box<str>, Box<str>>;

/// Timer handle.
pub trait MetricsTimer: Send + Sync {
    /// Stop the timer and record its duration.
    fn stop(&self);
}

/// Boundary contract for pipeline metrics.
pub trait MetricsPort: Send + Sync {
    /// Increment a counter by `value` (default should be 1 at call sites).
    fn increment_counter(&self, name: &str, value: u64, tags: Option<&MetricTags>);

    /// Record a duration (in milliseconds) for an operation.
    fn record_timer_ms(&self, name: &str, duration_ms: u64, tags: Option<&MetricTags>);

    /// Start a timer and return a handle that records on `stop()`.
    fn start_timer(&self, name: &str, tags: Option<&MetricTags>) -> Box<dyn MetricsTimer>;
}
