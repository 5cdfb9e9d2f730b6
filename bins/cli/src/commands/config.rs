//! Config command handlers.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use mlpm_config::{load_settings_std_env, settings_schema, to_pretty_json};
use mlpm_shared::ResultExt;
use std::path::Path;

/// Load, validate and print the effective settings.
///
/// Env overrides are applied. The insert key is printed masked.
pub fn run_config_check(mode: OutputMode, path: Option<&Path>) -> Result<CliOutput, CliError> {
    let settings = load_settings_std_env(path)?;
    let config = settings
        .to_monitor_config()
        .with_error_metadata("source", "settings")?;
    tracing::debug!(model = config.model_name(), "settings validated");

    let stdout = to_pretty_json(settings.as_ref())?;
    let stderr = if mode.quiet || mode.is_json() {
        String::new()
    } else {
        format!("settings ok for model {}\n", config.model_name())
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Print the JSON schema of the settings file.
pub fn run_config_schema() -> Result<CliOutput, CliError> {
    let mut stdout = serde_json::to_string_pretty(&settings_schema())?;
    stdout.push('\n');
    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
