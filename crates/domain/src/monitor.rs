//! Monitor identity and configuration validation.

use crate::value::{FieldValue, Metadata};
use mlpm_shared::{ErrorCode, ErrorEnvelope, SecretString};
use serde_json::Value;
use std::fmt;

/// Construction-time failures for [`MonitorConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `insert_key` is absent, null, or not a string.
    InvalidInsertKey,
    /// `insert_key` is blank.
    EmptyInsertKey,
    /// `model_name` was not provided at all.
    MissingModelName,
    /// `model_name` is present but not a string.
    InvalidModelName,
    /// `model_name` is blank.
    EmptyModelName,
    /// `metadata` is present but not a mapping.
    InvalidMetadata,
}

impl ConfigError {
    /// Name of the offending argument.
    pub const fn field(self) -> &'static str {
        match self {
            Self::InvalidInsertKey | Self::EmptyInsertKey => "insert_key",
            Self::MissingModelName | Self::InvalidModelName | Self::EmptyModelName => {
                "model_name"
            },
            Self::InvalidMetadata => "metadata",
        }
    }

    fn error_code(self) -> ErrorCode {
        let code = match self {
            Self::InvalidInsertKey => "invalid_insert_key",
            Self::EmptyInsertKey => "empty_insert_key",
            Self::MissingModelName => "missing_model_name",
            Self::InvalidModelName => "invalid_model_name",
            Self::EmptyModelName => "empty_model_name",
            Self::InvalidMetadata => "invalid_metadata",
        };
        ErrorCode::new("config", code)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::InvalidInsertKey => "insert_key instance type must str and not None",
            Self::EmptyInsertKey => "insert_key must be non-empty",
            Self::MissingModelName => "missing required argument: model_name",
            Self::InvalidModelName => "model_name instance type must be str",
            Self::EmptyModelName => "model_name must be non-empty",
            Self::InvalidMetadata => "metadata instance type must be Dict[str, Any] or None",
        };
        formatter.write_str(message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ErrorEnvelope {
    fn from(error: ConfigError) -> Self {
        Self::expected(error.error_code(), error.to_string()).with_field(error.field())
    }
}

/// Identity and tags of a monitored model.
///
/// `insert_key`, `model_name` and `metadata` are fixed at construction. The
/// column-name lists are owned by the application and may be replaced between
/// recording calls; an empty list means "unset".
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    insert_key: SecretString,
    model_name: String,
    metadata: Metadata,
    features_columns: Vec<String>,
    labels_columns: Vec<String>,
}

impl MonitorConfig {
    /// Build a config from typed values.
    ///
    /// ```
    /// use mlpm_domain::{ConfigError, MonitorConfig};
    ///
    /// let config = MonitorConfig::new("NRII-key", "iris-classifier", None)?;
    /// assert_eq!(config.model_name(), "iris-classifier");
    /// assert!(config.features_columns().is_empty());
    ///
    /// assert_eq!(MonitorConfig::new(" ", "iris", None), Err(ConfigError::EmptyInsertKey));
    /// # Ok::<(), ConfigError>(())
    /// ```
    pub fn new(
        insert_key: &str,
        model_name: &str,
        metadata: Option<Metadata>,
    ) -> Result<Self, ConfigError> {
        if insert_key.trim().is_empty() {
            return Err(ConfigError::EmptyInsertKey);
        }
        if model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }
        Ok(Self {
            insert_key: SecretString::new(insert_key),
            model_name: model_name.to_owned(),
            metadata: metadata.unwrap_or_default(),
            features_columns: Vec::new(),
            labels_columns: Vec::new(),
        })
    }

    /// Destination credential for the telemetry backend.
    pub const fn insert_key(&self) -> &SecretString {
        &self.insert_key
    }

    /// Monitored model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Tags merged into every record.
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Declared names for the columns of `X`.
    pub fn features_columns(&self) -> &[String] {
        &self.features_columns
    }

    /// Declared names for the columns of `y`.
    pub fn labels_columns(&self) -> &[String] {
        &self.labels_columns
    }

    /// Replace the declared feature column names. An empty list unsets them.
    pub fn set_features_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features_columns = columns.into_iter().map(Into::into).collect();
    }

    /// Replace the declared label column names. An empty list unsets them.
    pub fn set_labels_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels_columns = columns.into_iter().map(Into::into).collect();
    }
}

/// Validate dynamically-typed constructor arguments.
///
/// `None` means the argument was not supplied; `Some(Value::Null)` means it
/// was supplied as null. Checks run in order: insert key, model name,
/// metadata.
///
/// ```
/// use mlpm_domain::{ConfigError, validate_config};
/// use serde_json::json;
///
/// let error = validate_config(Some(&json!("key")), None, None).err();
/// assert_eq!(error, Some(ConfigError::MissingModelName));
///
/// let error = validate_config(Some(&json!(7)), Some(&json!("iris")), None).err();
/// assert_eq!(
///     error.map(|error| error.to_string()).as_deref(),
///     Some("insert_key instance type must str and not None")
/// );
/// ```
pub fn validate_config(
    insert_key: Option<&Value>,
    model_name: Option<&Value>,
    metadata: Option<&Value>,
) -> Result<MonitorConfig, ConfigError> {
    let Some(Value::String(insert_key)) = insert_key else {
        return Err(ConfigError::InvalidInsertKey);
    };
    if insert_key.trim().is_empty() {
        return Err(ConfigError::EmptyInsertKey);
    }
    let Some(model_name) = model_name else {
        return Err(ConfigError::MissingModelName);
    };
    let Value::String(model_name) = model_name else {
        return Err(ConfigError::InvalidModelName);
    };
    if model_name.trim().is_empty() {
        return Err(ConfigError::EmptyModelName);
    }
    let metadata = match metadata {
        None | Some(Value::Null) => None,
        Some(Value::Object(entries)) => Some(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), FieldValue::from_json(value)))
                .collect(),
        ),
        Some(_) => return Err(ConfigError::InvalidMetadata),
    };
    MonitorConfig::new(insert_key, model_name, metadata)
}
