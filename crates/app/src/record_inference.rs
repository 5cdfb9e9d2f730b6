//! Record one batch of inference data.

use crate::observe::{Observer, duration_ms, error_tags, fields};
use mlpm_domain::{
    BatchInput, DEFAULT_DATA_SUMMARY_MIN_ROWS, InferenceBatch, MetricRecord, MonitorConfig,
    RecordBatch, RecordBuilder, summary_metric_records,
};
use mlpm_ports::{LoggerPort, MetricsPort, RecordSinkPort};
use mlpm_shared::{Result, ResultExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Per-call recording options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOptions {
    /// Send column summaries of large enough batches as data metrics.
    pub send_data_metrics: bool,
    /// Smallest batch that gets summarized.
    pub data_summary_min_rows: usize,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            send_data_metrics: false,
            data_summary_min_rows: DEFAULT_DATA_SUMMARY_MIN_ROWS,
        }
    }
}

impl RecordOptions {
    /// Whether a batch of `rows` rows gets summarized.
    pub const fn summarizes(&self, rows: usize) -> bool {
        self.send_data_metrics && rows >= self.data_summary_min_rows
    }
}

/// Dependencies shared by the recording use cases.
#[derive(Clone)]
pub struct RecordDeps {
    /// Receives built records.
    pub sink: Arc<dyn RecordSinkPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
    /// Optional pipeline metrics.
    pub metrics: Option<Arc<dyn MetricsPort>>,
}

impl RecordDeps {
    /// Dependencies with only a sink.
    pub fn new(sink: Arc<dyn RecordSinkPort>) -> Self {
        Self {
            sink,
            logger: None,
            metrics: None,
        }
    }

    /// Attach a logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn LoggerPort>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Attach pipeline metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsPort>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub(crate) fn observer(&self) -> Observer<'_> {
        Observer {
            logger: self.logger.as_ref(),
            metrics: self.metrics.as_ref(),
        }
    }
}

/// What one recording call handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInferenceOutput {
    /// Inference records sent.
    pub records: usize,
    /// Data summary metrics sent.
    pub data_metrics: usize,
}

/// Build records for a batch and hand them to the sink.
///
/// Column names are read from `config` on every call. When enabled in
/// `options`, batches with at least `data_summary_min_rows` rows are also
/// summarized into data metrics.
///
/// Records and data metrics are both built before the sink sees anything, so
/// a batch that fails validation sends nothing. The sink then receives the
/// inference records first. When the metric submission fails after that, the
/// error is returned although the records were already delivered.
#[tracing::instrument(skip_all, fields(model = %config.model_name()))]
pub fn record_inference_data(
    deps: &RecordDeps,
    config: &MonitorConfig,
    options: &RecordOptions,
    input: &InferenceBatch,
) -> Result<RecordInferenceOutput> {
    let started_at = Instant::now();
    let observer = deps.observer();
    let total_timer = deps
        .metrics
        .as_ref()
        .map(|metrics| metrics.start_timer("monitor.recordInference.total", None));

    observer.info(
        "monitor.recordInference.start",
        "Record inference data started",
        fields([
            ("modelName", Value::from(config.model_name())),
            ("rows", rows_hint(input)),
        ]),
    );

    let result = send_batch(deps, config, options, input);

    if let Some(timer) = total_timer.as_ref() {
        timer.stop();
    }

    match result {
        Ok(output) => {
            observer.count("monitor.recordInference.executed", 1, None);
            observer.count(
                "monitor.recordInference.records",
                u64::try_from(output.records).unwrap_or(u64::MAX),
                None,
            );
            observer.info(
                "monitor.recordInference.completed",
                "Record inference data completed",
                fields([
                    ("modelName", Value::from(config.model_name())),
                    ("records", Value::from(output.records)),
                    ("dataMetrics", Value::from(output.data_metrics)),
                    ("durationMs", Value::from(duration_ms(started_at))),
                ]),
            );
            Ok(output)
        },
        Err(error) => {
            tracing::debug!(code = %error.code, "record inference data failed");
            observer.count("monitor.recordInference.failed", 1, Some(&error_tags(&error)));
            observer.failed(
                "monitor.recordInference.failed",
                "Record inference data failed",
                fields([
                    ("modelName", Value::from(config.model_name())),
                    ("durationMs", Value::from(duration_ms(started_at))),
                ]),
                &error,
            );
            Err(error)
        },
    }
}

fn send_batch(
    deps: &RecordDeps,
    config: &MonitorConfig,
    options: &RecordOptions,
    input: &InferenceBatch,
) -> Result<RecordInferenceOutput> {
    let batch = RecordBuilder::new(config)
        .build_batch(input)
        .into_envelope()?;
    let metrics = data_metric_records(deps, config, options, &batch);

    if !batch.is_empty() {
        deps.sink
            .send_inference_records(config.model_name(), &batch.records)?;
    }
    if !metrics.is_empty() {
        deps.sink.send_metric_records(config.model_name(), &metrics)?;
    }

    Ok(RecordInferenceOutput {
        records: batch.len(),
        data_metrics: metrics.len(),
    })
}

fn data_metric_records(
    deps: &RecordDeps,
    config: &MonitorConfig,
    options: &RecordOptions,
    batch: &RecordBatch,
) -> Vec<MetricRecord> {
    if options.summarizes(batch.len()) {
        return summary_metric_records(config, batch);
    }
    if options.send_data_metrics {
        deps.observer().debug(
            "monitor.recordInference.summarySkipped",
            "Batch below data summary threshold",
            fields([
                ("rows", Value::from(batch.len())),
                ("minRows", Value::from(options.data_summary_min_rows)),
            ]),
        );
    }
    Vec::new()
}

fn rows_hint(input: &InferenceBatch) -> Value {
    input
        .x
        .as_ref()
        .and_then(BatchInput::as_tabular)
        .map_or(Value::Null, |x| Value::from(x.row_count()))
}
