//! Monitor wiring shared by the recording commands.

use crate::error::CliError;
use crate::format::LogArgs;
use mlpm_adapters::{JsonLinesRecordSink, JsonMetrics, StderrLogSink, TracingLogger};
use mlpm_app::{PerformanceMonitor, RecordDeps, RecordOptions};
use mlpm_config::load_settings_std_env;
use mlpm_ports::{LogFields, LoggerPort, RecordSinkPort};
use mlpm_shared::ResultExt;
use serde_json::Value;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Monitor writing JSON lines to stdout, configured from settings and env.
pub fn build_monitor(
    config_path: Option<&Path>,
    logs: &LogArgs,
) -> Result<PerformanceMonitor, CliError> {
    let settings = load_settings_std_env(config_path)?;
    let options = RecordOptions {
        send_data_metrics: settings.send_data_metrics(),
        data_summary_min_rows: usize::try_from(settings.data_summary_min_rows().get())
            .unwrap_or(usize::MAX),
    };
    let config = settings
        .to_monitor_config()
        .with_error_metadata("source", "settings")?;

    let mut base_fields = LogFields::new();
    base_fields.insert("component".into(), Value::from("cli"));
    let logger = TracingLogger::new().child(base_fields);

    let sink: Arc<dyn RecordSinkPort> = Arc::new(JsonLinesRecordSink::new(io::stdout()));
    let mut deps = RecordDeps::new(sink).with_logger(Arc::from(logger));
    if logs.pipeline_metrics {
        deps = deps.with_metrics(Arc::new(JsonMetrics::new(Arc::new(StderrLogSink))));
    }

    Ok(PerformanceMonitor::new(config, options, deps))
}
