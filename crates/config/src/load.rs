//! Settings loading helpers (env + file).
//!
//! The loader owns the merge order and surfaces user-facing errors as typed
//! `ErrorEnvelope`s.

use crate::env::{MonitorEnv, apply_env_overrides};
use crate::schema::{Settings, ValidatedSettings};
use mlpm_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use schemars::{Schema, schema_for};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load settings from an optional file path.
///
/// Precedence (highest wins):
/// - env overrides (`MonitorEnv`)
/// - settings file
/// - defaults (`Settings::default()`)
pub fn load_settings_from_path(
    config_path: Option<&Path>,
    env: &MonitorEnv,
) -> Result<ValidatedSettings, ErrorEnvelope> {
    let settings = match config_path {
        None => Settings::default(),
        Some(path) => {
            let format = detect_config_format(path)?;
            let config_text = read_config_file(path)?;
            tracing::debug!(path = %path.display(), ?format, "loaded settings file");
            parse_config_unvalidated(&config_text, format)?
        },
    };

    // env is applied last and also validates/normalizes the result.
    apply_env_overrides(settings, env)
}

/// Load settings from std env and an optional file path.
pub fn load_settings_std_env(config_path: Option<&Path>) -> Result<ValidatedSettings, ErrorEnvelope> {
    let env = MonitorEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_settings_from_path(config_path, &env)
}

/// Serialize settings as pretty JSON (with trailing newline).
///
/// The insert key is written masked.
pub fn to_pretty_json(settings: &Settings) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(settings).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize settings: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// JSON Schema of the settings file.
#[must_use]
pub fn settings_schema() -> Schema {
    schema_for!(Settings)
}

fn parse_config_unvalidated(input: &str, format: ConfigFormat) -> Result<Settings, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("settings", "invalid_json"),
                format!("invalid settings JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("settings", "invalid_toml"),
                format!("invalid settings TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("settings", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("settings", "config_file_permission_denied")
            },
            _ => ErrorCode::new("settings", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read settings file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("settings", "unsupported_format"),
            "unsupported settings format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn format_follows_extension() -> Result<(), Box<dyn Error>> {
        assert_eq!(detect_config_format(Path::new("mlpm"))?, ConfigFormat::Json);
        assert_eq!(
            detect_config_format(Path::new("mlpm.TOML"))?,
            ConfigFormat::Toml
        );
        let error = detect_config_format(Path::new("mlpm.yaml")).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("settings", "unsupported_format"))
        );
        Ok(())
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let error = load_settings_from_path(
            Some(Path::new("/nonexistent/mlpm.json")),
            &MonitorEnv::default(),
        )
        .err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("settings", "config_file_not_found"))
        );
    }

    #[test]
    fn no_path_means_defaults() -> Result<(), Box<dyn Error>> {
        let settings = load_settings_from_path(None, &MonitorEnv::default())?;
        assert_eq!(settings.as_ref(), &Settings::default());
        Ok(())
    }

    #[test]
    fn pretty_json_ends_with_newline() -> Result<(), Box<dyn Error>> {
        let output = to_pretty_json(&Settings::default())?;
        assert!(output.ends_with("}\n"));
        assert!(output.contains("\"dataSummaryMinRows\": 100"));
        Ok(())
    }

    #[test]
    fn schema_lists_settings_properties() -> Result<(), Box<dyn Error>> {
        let schema = serde_json::to_value(settings_schema())?;
        let properties = schema
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .ok_or("schema must describe properties")?;
        for key in ["insertKey", "modelName", "metadata", "sendDataMetrics"] {
            assert!(properties.contains_key(key), "missing {key}");
        }
        Ok(())
    }
}
