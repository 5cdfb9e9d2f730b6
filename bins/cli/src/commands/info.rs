//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use mlpm_adapters::adapters_crate_version;
use mlpm_app::app_crate_version;
use mlpm_config::{CURRENT_CONFIG_VERSION, config_crate_version};
use mlpm_domain::domain_crate_version;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    domain_version: &'static str,
    config_version: &'static str,
    app_version: &'static str,
    adapters_version: &'static str,
    settings_version: u32,
}

impl BuildInfo {
    const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            domain_version: domain_crate_version(),
            config_version: config_crate_version(),
            app_version: app_crate_version(),
            adapters_version: adapters_crate_version(),
            settings_version: CURRENT_CONFIG_VERSION,
        }
    }
}

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = BuildInfo::current();

    let stdout = if mode.is_json() {
        format_info_json(&build)?
    } else {
        format_info_text(&build)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_info_text(build: &BuildInfo) -> String {
    format!(
        "status: ok\nname: {}\nversion: {}\ndomain: {}\nconfig: {}\napp: {}\nadapters: {}\nsettings version: {}\n",
        build.name,
        build.version,
        build.domain_version,
        build.config_version,
        build.app_version,
        build.adapters_version,
        build.settings_version,
    )
}

fn format_info_json(build: &BuildInfo) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": "ok",
        "build": build,
    });
    let mut output = serde_json::to_string_pretty(&payload)?;
    output.push('\n');
    Ok(output)
}
