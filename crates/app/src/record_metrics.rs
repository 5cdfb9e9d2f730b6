//! Record model metrics.

use crate::observe::{duration_ms, error_tags, fields};
use crate::record_inference::RecordDeps;
use mlpm_domain::{MonitorConfig, build_metric_records};
use mlpm_shared::{Result, ResultExt};
use serde_json::Value;
use std::time::Instant;

/// Validate a `name -> number` mapping and hand it to the sink.
///
/// Returns the number of metrics sent.
#[tracing::instrument(skip_all, fields(model = %config.model_name()))]
pub fn record_metrics(deps: &RecordDeps, config: &MonitorConfig, metrics: &Value) -> Result<usize> {
    let started_at = Instant::now();
    let observer = deps.observer();

    let result = build_metric_records(config, metrics)
        .into_envelope()
        .and_then(|records| {
            if !records.is_empty() {
                deps.sink.send_metric_records(config.model_name(), &records)?;
            }
            Ok(records.len())
        });

    match result {
        Ok(sent) => {
            observer.count(
                "monitor.recordMetrics.metrics",
                u64::try_from(sent).unwrap_or(u64::MAX),
                None,
            );
            observer.info(
                "monitor.recordMetrics.completed",
                "Record metrics completed",
                fields([
                    ("modelName", Value::from(config.model_name())),
                    ("metrics", Value::from(sent)),
                    ("durationMs", Value::from(duration_ms(started_at))),
                ]),
            );
            Ok(sent)
        },
        Err(error) => {
            observer.count("monitor.recordMetrics.failed", 1, Some(&error_tags(&error)));
            observer.failed(
                "monitor.recordMetrics.failed",
                "Record metrics failed",
                fields([("modelName", Value::from(config.model_name()))]),
                &error,
            );
            Err(error)
        },
    }
}
