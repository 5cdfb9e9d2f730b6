//! Record command handler.

use super::input::read_json_input;
use super::pipeline::build_monitor;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{LogArgs, OutputMode};
use mlpm_app::RecordInferenceOutput;
use mlpm_domain::InferenceBatch;
use std::path::Path;

/// Inputs for the record command.
#[derive(Debug, Clone, Copy)]
pub struct RecordCommandInput<'a> {
    pub config: Option<&'a Path>,
    pub batch: &'a Path,
    pub features_columns: &'a [String],
    pub labels_columns: &'a [String],
}

/// Read one `{"X": .., "y": ..}` batch and write its records to stdout.
///
/// Column flags override the settings file for this run.
pub fn run_record(
    mode: OutputMode,
    logs: &LogArgs,
    input: RecordCommandInput<'_>,
) -> Result<CliOutput, CliError> {
    let mut monitor = build_monitor(input.config, logs)?;
    if !input.features_columns.is_empty() {
        monitor.set_features_columns(input.features_columns.iter().map(String::as_str));
    }
    if !input.labels_columns.is_empty() {
        monitor.set_labels_columns(input.labels_columns.iter().map(String::as_str));
    }

    let payload = read_json_input(input.batch)?;
    if !payload.is_object() {
        return Err(CliError::InvalidInput(
            "batch must be a JSON object with \"X\" and \"y\"".to_owned(),
        ));
    }
    let output = monitor.record_inference_data(&InferenceBatch::from_json(&payload))?;

    Ok(CliOutput {
        stdout: String::new(),
        stderr: format_summary(mode, monitor.config().model_name(), output)?,
        exit_code: ExitCode::Ok,
    })
}

fn format_summary(
    mode: OutputMode,
    model_name: &str,
    output: RecordInferenceOutput,
) -> Result<String, CliError> {
    if mode.quiet {
        return Ok(String::new());
    }
    if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "kind": "record",
            "modelName": model_name,
            "records": output.records,
            "dataMetrics": output.data_metrics,
        });
        let mut line = serde_json::to_string(&payload)?;
        line.push('\n');
        return Ok(line);
    }
    Ok(format!(
        "recorded {} inference records and {} data metrics for model {model_name}\n",
        output.records, output.data_metrics
    ))
}
