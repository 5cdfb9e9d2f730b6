//! Facade owning a monitor configuration and its dependencies.

use crate::record_inference::{
    RecordDeps, RecordInferenceOutput, RecordOptions, record_inference_data,
};
use crate::record_metrics::record_metrics;
use mlpm_domain::{BatchInput, InferenceBatch, MonitorConfig};
use mlpm_shared::Result;
use serde_json::Value;

/// Records inference data and metrics for one model.
///
/// Column names set through the setters apply to every later call.
#[derive(Clone)]
pub struct PerformanceMonitor {
    config: MonitorConfig,
    options: RecordOptions,
    deps: RecordDeps,
}

impl PerformanceMonitor {
    /// Monitor for `config`, sending through `deps`.
    pub const fn new(config: MonitorConfig, options: RecordOptions, deps: RecordDeps) -> Self {
        Self {
            config,
            options,
            deps,
        }
    }

    /// Current configuration.
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Recording options.
    pub const fn options(&self) -> &RecordOptions {
        &self.options
    }

    /// Replace the feature column names. An empty list restores defaults.
    pub fn set_features_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.set_features_columns(columns);
    }

    /// Replace the label column names. An empty list restores defaults.
    pub fn set_labels_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.set_labels_columns(columns);
    }

    /// Record a batch.
    pub fn record_inference_data(&self, input: &InferenceBatch) -> Result<RecordInferenceOutput> {
        record_inference_data(&self.deps, &self.config, &self.options, input)
    }

    /// Record a batch given as separate `X` and `y` inputs.
    pub fn record(
        &self,
        x: Option<BatchInput>,
        y: Option<BatchInput>,
    ) -> Result<RecordInferenceOutput> {
        self.record_inference_data(&InferenceBatch { x, y })
    }

    /// Record model metrics.
    pub fn record_metrics(&self, metrics: &Value) -> Result<usize> {
        record_metrics(&self.deps, &self.config, metrics)
    }
}
