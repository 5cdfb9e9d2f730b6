//! # mlpm-app
//!
//! Application use cases for recording inference data and model metrics.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod monitor;
mod observe;
pub mod record_inference;
pub mod record_metrics;

pub use monitor::PerformanceMonitor;
pub use record_inference::{
    RecordDeps, RecordInferenceOutput, RecordOptions, record_inference_data,
};
pub use record_metrics::record_metrics;

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
