//! # mlpm-domain
//!
//! Domain model for ML performance monitoring.
//!
//! - **Values** - `FieldValue`, `Metadata`, `InputKind`
//! - **Tabular inputs** - `DataFrame`, `NumericArray`, `BatchInput`, the `Tabular` trait
//! - **Monitor** - `MonitorConfig` and `validate_config`
//! - **Records** - `RecordBuilder`, `build_records`, `TelemetryRecord`
//! - **Metrics** - model metrics and data summaries as `MetricRecord`s
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use mlpm_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod builder;
pub mod metric;
pub mod monitor;
pub mod record;
pub mod summary;
pub mod tabular;
pub mod validation;
pub mod value;

pub use builder::{
    DEFAULT_FEATURE_PREFIX, DEFAULT_LABEL_PREFIX, InferenceBatch, RecordBuilder, build_records,
    default_column_names,
};
pub use metric::{DATA_METRIC_ATTRIBUTE, MetricRecord, build_metric_records};
pub use monitor::{ConfigError, MonitorConfig, validate_config};
pub use record::{RecordBatch, TelemetryRecord};
pub use summary::{
    ColumnSummary, DEFAULT_DATA_SUMMARY_MIN_ROWS, summarize_batch, summary_metric_records,
};
pub use tabular::{BatchInput, DataFrame, NumericArray, NumericData, Tabular, TabularError};
pub use validation::{BatchArgument, MissingArguments, ValidationError};
pub use value::{FieldValue, InputKind, Metadata};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
