//! Environment variable parsing and env-to-settings merging.
//!
//! Invalid values fail fast, and secret values are redacted in error
//! metadata.

use crate::schema::{Settings, ValidatedSettings};
use mlpm_shared::{ErrorCode, ErrorEnvelope, SecretString, redact_if_secret};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: ingest insert key.
pub const ENV_INSERT_KEY: &str = "MLPM_INSERT_KEY";
/// Env var: ingest insert key (alias).
pub const ENV_INSERT_KEY_ALIAS: &str = "NEW_RELIC_INSERT_KEY";
/// Env var: monitored model name.
pub const ENV_MODEL_NAME: &str = "MLPM_MODEL_NAME";
/// Env var: send column summaries as data metrics.
pub const ENV_SEND_DATA_METRICS: &str = "MLPM_SEND_DATA_METRICS";
/// Env var: smallest batch that gets summarized.
pub const ENV_DATA_SUMMARY_MIN_ROWS: &str = "MLPM_DATA_SUMMARY_MIN_ROWS";

const ENV_VARS: [&str; 5] = [
    ENV_INSERT_KEY,
    ENV_INSERT_KEY_ALIAS,
    ENV_MODEL_NAME,
    ENV_SEND_DATA_METRICS,
    ENV_DATA_SUMMARY_MIN_ROWS,
];

/// Parsed env overrides. Absent variables leave the settings untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorEnv {
    /// Insert key; `MLPM_INSERT_KEY` wins over the alias.
    pub insert_key: Option<SecretString>,
    /// Model name.
    pub model_name: Option<String>,
    /// Data metrics toggle.
    pub send_data_metrics: Option<bool>,
    /// Data summary row threshold.
    pub data_summary_min_rows: Option<u32>,
}

impl MonitorEnv {
    /// Parse env overrides from a name to value map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            insert_key: parse_optional_secret_any(map, &[ENV_INSERT_KEY, ENV_INSERT_KEY_ALIAS])?,
            model_name: parse_optional_trimmed_string(map, ENV_MODEL_NAME)?,
            send_data_metrics: parse_optional_bool(map, ENV_SEND_DATA_METRICS)?,
            data_summary_min_rows: parse_optional_u32(map, ENV_DATA_SUMMARY_MIN_ROWS)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    pub const fn is_empty(&self) -> bool {
        self.insert_key.is_none()
            && self.model_name.is_none()
            && self.send_data_metrics.is_none()
            && self.data_summary_min_rows.is_none()
    }
}

/// Apply env overrides on top of `base`, then validate the result.
pub fn apply_env_overrides(
    base: Settings,
    env: &MonitorEnv,
) -> Result<ValidatedSettings, ErrorEnvelope> {
    let mut settings = base;
    if let Some(insert_key) = &env.insert_key {
        settings.insert_key = Some(insert_key.clone());
    }
    if let Some(model_name) = &env.model_name {
        settings.model_name = Some(model_name.clone());
    }
    if let Some(send_data_metrics) = env.send_data_metrics {
        settings.send_data_metrics = send_data_metrics;
    }
    if let Some(min_rows) = env.data_summary_min_rows {
        settings.data_summary_min_rows = min_rows;
    }

    settings.validate_and_normalize().map_err(Into::into)
}

/// Env parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// A secret env var was present but empty after trimming.
    EmptySecret {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } | Self::EmptySecret { .. } => {
                ErrorCode::new("settings", "empty_env_var")
            },
            Self::InvalidBool { .. } => ErrorCode::new("settings", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("settings", "invalid_env_int"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } | Self::EmptySecret { var } => {
                write!(formatter, "{var} must be non-empty")
            },
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } | EnvParseError::EmptySecret { var } => {
                envelope.with_metadata("env_var", var)
            },
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidInt { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_secret(var, &value))
            },
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed.to_owned()))
}

fn parse_optional_secret(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<SecretString>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptySecret { var });
    }

    Ok(Some(SecretString::new(trimmed.to_owned())))
}

fn parse_optional_secret_any(
    map: &BTreeMap<String, String>,
    vars: &[&'static str],
) -> Result<Option<SecretString>, EnvParseError> {
    for var in vars {
        if map.contains_key(*var) {
            return parse_optional_secret(map, var);
        }
    }
    Ok(None)
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}
