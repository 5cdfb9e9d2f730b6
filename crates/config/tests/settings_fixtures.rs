//! Integration tests for loading settings fixtures with env overrides.

use mlpm_config::{
    ENV_INSERT_KEY, ENV_MODEL_NAME, MonitorEnv, load_settings_from_path, to_pretty_json,
};
use mlpm_domain::{ConfigError, FieldValue};
use mlpm_shared::ErrorCode;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn env(entries: &[(&str, &str)]) -> Result<MonitorEnv, Box<dyn Error>> {
    let map: BTreeMap<String, String> = entries
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect();
    Ok(MonitorEnv::from_map(&map)?)
}

#[test]
fn json_fixture_builds_a_monitor_config() -> Result<(), Box<dyn Error>> {
    let path = fixture("settings.valid.json");
    let settings = load_settings_from_path(Some(&path), &MonitorEnv::default())?;

    assert!(settings.send_data_metrics());
    assert_eq!(settings.data_summary_min_rows().get(), 50);

    let config = settings.to_monitor_config()?;
    assert_eq!(config.model_name(), "Boston Housing XGB");
    assert_eq!(config.features_columns(), ["CRIM", "ZN", "INDUS", "CHAS"]);
    assert_eq!(config.labels_columns(), ["MEDV"]);
    assert_eq!(
        config.metadata().get("owner"),
        Some(&FieldValue::from(r#"{"team":"ml-platform"}"#))
    );
    Ok(())
}

#[test]
fn toml_fixture_needs_an_insert_key_from_env() -> Result<(), Box<dyn Error>> {
    let path = fixture("settings.valid.toml");

    let settings = load_settings_from_path(Some(&path), &MonitorEnv::default())?;
    assert_eq!(
        settings.to_monitor_config().err(),
        Some(ConfigError::InvalidInsertKey)
    );

    let settings = load_settings_from_path(
        Some(&path),
        &env(&[(ENV_INSERT_KEY, "NRII-from-env"), (ENV_MODEL_NAME, "iris-v2")])?,
    )?;
    let config = settings.to_monitor_config()?;
    assert_eq!(config.insert_key().expose(), "NRII-from-env");
    assert_eq!(config.model_name(), "iris-v2");
    assert_eq!(config.metadata().get("release"), Some(&FieldValue::Int(7)));
    Ok(())
}

#[test]
fn unsupported_version_is_reported() -> Result<(), Box<dyn Error>> {
    let path = fixture("settings.bad-version.json");
    let Err(error) = load_settings_from_path(Some(&path), &MonitorEnv::default()) else {
        return Err("version 3 must be rejected".into());
    };
    assert_eq!(error.code, ErrorCode::new("settings", "unsupported_version"));
    assert_eq!(error.metadata.get("found").map(String::as_str), Some("3"));
    Ok(())
}

#[test]
fn out_of_range_rows_are_reported() -> Result<(), Box<dyn Error>> {
    let path = fixture("settings.bad-rows.toml");
    let Err(error) = load_settings_from_path(Some(&path), &MonitorEnv::default()) else {
        return Err("five million rows must be rejected".into());
    };
    assert_eq!(error.code, ErrorCode::new("settings", "invalid_limit"));
    assert_eq!(error.field(), Some("dataSummaryMinRows"));
    Ok(())
}

#[test]
fn printed_settings_never_show_the_key() -> Result<(), Box<dyn Error>> {
    let path = fixture("settings.valid.json");
    let settings = load_settings_from_path(Some(&path), &MonitorEnv::default())?;
    let output = to_pretty_json(settings.as_ref())?;

    assert!(!output.contains("NRII-fixture"));
    assert!(output.contains("0000\""));
    Ok(())
}
