//! Metrics command handler.

use super::input::read_json_input;
use super::pipeline::build_monitor;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{LogArgs, OutputMode};
use std::path::Path;

/// Read a `name -> number` object and write one metric line per entry.
pub fn run_metrics(
    mode: OutputMode,
    logs: &LogArgs,
    config: Option<&Path>,
    metrics: &Path,
) -> Result<CliOutput, CliError> {
    let monitor = build_monitor(config, logs)?;
    let payload = read_json_input(metrics)?;
    let sent = monitor.record_metrics(&payload)?;

    let stderr = if mode.quiet {
        String::new()
    } else if mode.is_json() {
        let mut line = serde_json::to_string(&serde_json::json!({
            "status": "ok",
            "kind": "metrics",
            "modelName": monitor.config().model_name(),
            "metrics": sent,
        }))?;
        line.push('\n');
        line
    } else {
        format!(
            "recorded {sent} metrics for model {}\n",
            monitor.config().model_name()
        )
    };

    Ok(CliOutput {
        stdout: String::new(),
        stderr,
        exit_code: ExitCode::Ok,
    })
}
