//! # mlpm-config
//!
//! Settings file schema, env overrides and loading for the monitor.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Settings loading helpers (env + file).
pub mod load;
/// Settings schema types and validation.
pub mod schema;

pub use env::{
    ENV_DATA_SUMMARY_MIN_ROWS, ENV_INSERT_KEY, ENV_INSERT_KEY_ALIAS, ENV_MODEL_NAME,
    ENV_SEND_DATA_METRICS, EnvParseError, MonitorEnv, apply_env_overrides,
};
pub use load::{load_settings_from_path, load_settings_std_env, settings_schema, to_pretty_json};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_MIN_ROWS, DataSummaryMinRows,
    MAX_DATA_SUMMARY_ROWS, MIN_DATA_SUMMARY_ROWS, Settings, ValidatedSettings, parse_settings_json,
    parse_settings_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
