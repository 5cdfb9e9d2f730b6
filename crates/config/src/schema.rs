//! Settings file schema, validation and normalization.

use mlpm_domain::{ConfigError, MonitorConfig, validate_config};
use mlpm_shared::{BoundedU32, ErrorCode, ErrorEnvelope, SecretString};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Current settings file version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Smallest accepted `dataSummaryMinRows`.
pub const MIN_DATA_SUMMARY_ROWS: u32 = 1;
/// Largest accepted `dataSummaryMinRows`.
pub const MAX_DATA_SUMMARY_ROWS: u32 = 1_000_000;

/// Row threshold for data summaries, bounded at validation time.
pub type DataSummaryMinRows = BoundedU32<MIN_DATA_SUMMARY_ROWS, MAX_DATA_SUMMARY_ROWS>;

/// Default `dataSummaryMinRows`.
pub const DEFAULT_MIN_ROWS: u32 = 100;

/// Monitor settings as read from a `.json` or `.toml` file.
///
/// Every field is optional in the file. The insert key and model name are
/// checked when the settings are turned into a [`MonitorConfig`], so a file
/// may omit them and rely on env overrides instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Settings {
    /// Settings file version.
    pub version: u32,
    /// Ingest key. Serialized masked.
    #[serde(with = "masked_secret", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub insert_key: Option<SecretString>,
    /// Name of the monitored model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Tags copied into every record and metric.
    pub metadata: BTreeMap<String, Value>,
    /// Names for the columns of `X`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_columns: Option<Vec<String>>,
    /// Names for the columns of `y`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_columns: Option<Vec<String>>,
    /// Send column summaries of each batch as data metrics.
    pub send_data_metrics: bool,
    /// Smallest batch that gets summarized.
    pub data_summary_min_rows: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            insert_key: None,
            model_name: None,
            metadata: BTreeMap::new(),
            features_columns: None,
            labels_columns: None,
            send_data_metrics: false,
            data_summary_min_rows: DEFAULT_MIN_ROWS,
        }
    }
}

impl Settings {
    /// Validate the settings and normalize column lists.
    ///
    /// Column names are trimmed; an empty list is the same as no list.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedSettings, ConfigSchemaError> {
        self.validate_version()?;

        let data_summary_min_rows = DataSummaryMinRows::try_new(self.data_summary_min_rows)
            .map_err(|error| ConfigSchemaError::LimitOutOfRange {
                field: "dataSummaryMinRows",
                value: error.value,
                min: error.min,
                max: error.max,
            })?;

        self.features_columns = normalize_columns("featuresColumns", self.features_columns)?;
        self.labels_columns = normalize_columns("labelsColumns", self.labels_columns)?;

        Ok(ValidatedSettings {
            raw: self,
            data_summary_min_rows,
        })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

fn normalize_columns(
    field: &'static str,
    columns: Option<Vec<String>>,
) -> Result<Option<Vec<String>>, ConfigSchemaError> {
    let Some(columns) = columns else {
        return Ok(None);
    };
    let mut normalized = Vec::with_capacity(columns.len());
    for (index, column) in columns.into_iter().enumerate() {
        let trimmed = column.trim();
        if trimmed.is_empty() {
            return Err(ConfigSchemaError::EmptyColumnName { field, index });
        }
        normalized.push(trimmed.to_owned());
    }
    Ok((!normalized.is_empty()).then_some(normalized))
}

/// Settings that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    raw: Settings,
    data_summary_min_rows: DataSummaryMinRows,
}

impl ValidatedSettings {
    /// Whether column summaries are sent as data metrics.
    #[must_use]
    pub const fn send_data_metrics(&self) -> bool {
        self.raw.send_data_metrics
    }

    /// Smallest batch that gets summarized.
    #[must_use]
    pub const fn data_summary_min_rows(&self) -> DataSummaryMinRows {
        self.data_summary_min_rows
    }

    /// Build the monitor configuration these settings describe.
    ///
    /// Runs the same checks as [`validate_config`], so a missing insert key
    /// or model name fails with the usual construction error.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let insert_key = self
            .raw
            .insert_key
            .as_ref()
            .map(|key| Value::String(key.expose().to_owned()));
        let model_name = self.raw.model_name.clone().map(Value::String);
        let metadata = Value::Object(
            self.raw
                .metadata
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        );

        let mut config = validate_config(insert_key.as_ref(), model_name.as_ref(), Some(&metadata))?;
        if let Some(columns) = &self.raw.features_columns {
            config.set_features_columns(columns);
        }
        if let Some(columns) = &self.raw.labels_columns {
            config.set_labels_columns(columns);
        }
        Ok(config)
    }

    /// Consume the wrapper and return the raw settings.
    #[must_use]
    pub fn into_inner(self) -> Settings {
        self.raw
    }
}

impl AsRef<Settings> for ValidatedSettings {
    fn as_ref(&self) -> &Settings {
        &self.raw
    }
}

/// Parse settings from a JSON string, applying validation and normalization.
pub fn parse_settings_json(input: &str) -> Result<ValidatedSettings, ErrorEnvelope> {
    let settings: Settings = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("settings", "invalid_json"),
            format!("invalid settings JSON: {error}"),
        )
    })?;

    settings.validate_and_normalize().map_err(Into::into)
}

/// Parse settings from a TOML string, applying validation and normalization.
pub fn parse_settings_toml(input: &str) -> Result<ValidatedSettings, ErrorEnvelope> {
    let settings: Settings = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("settings", "invalid_toml"),
            format!("invalid settings TOML: {error}"),
        )
    })?;

    settings.validate_and_normalize().map_err(Into::into)
}

/// Settings schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The settings file version is not supported.
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Supported version.
        supported: u32,
    },
    /// A numeric limit is outside its allowed range.
    LimitOutOfRange {
        /// Field name in the settings file.
        field: &'static str,
        /// Provided value.
        value: u32,
        /// Minimum allowed value.
        min: u32,
        /// Maximum allowed value.
        max: u32,
    },
    /// A column list holds a blank name.
    EmptyColumnName {
        /// Field name in the settings file.
        field: &'static str,
        /// Position of the blank entry.
        index: usize,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("settings", "unsupported_version"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("settings", "invalid_limit"),
            Self::EmptyColumnName { .. } => ErrorCode::new("settings", "empty_column_name"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported settings version: {found} (supported: {supported})"
                )
            },
            Self::LimitOutOfRange {
                field,
                value,
                min,
                max,
            } => write!(formatter, "{field} must be within [{min}, {max}], got {value}"),
            Self::EmptyColumnName { field, index } => {
                write!(formatter, "{field}[{index}] must be a non-empty column name")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::LimitOutOfRange {
                field,
                value,
                min,
                max,
            } => envelope
                .with_field(field)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::EmptyColumnName { field, index } => envelope
                .with_field(field)
                .with_metadata("index", index.to_string()),
        }
    }
}

mod masked_secret {
    use mlpm_shared::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(
        clippy::ref_option,
        reason = "serde `with` modules receive the field by reference"
    )]
    pub fn serialize<S: Serializer>(
        secret: &Option<SecretString>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match secret {
            Some(secret) => serializer.serialize_some(&secret.masked()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SecretString>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
    }
}
