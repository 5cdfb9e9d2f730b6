//! Inference batch validation and record assembly.
//!
//! Checks run in a fixed order and the first failure aborts the call:
//!
//! 1. presence of `X` and `y`
//! 2. `X` type, then `X` dimensionality, then `y` type
//! 3. equal row counts
//! 4. `features_columns` against `X`, then `labels_columns` against `y`
//!
//! Only then is one record assembled per row.

use crate::monitor::MonitorConfig;
use crate::record::{RecordBatch, TelemetryRecord};
use crate::tabular::{BatchInput, Tabular};
use crate::validation::{BatchArgument, MissingArguments, ValidationError};
use crate::value::FieldValue;
use serde_json::Value;

/// Prefix of generated names for unnamed `X` columns.
pub const DEFAULT_FEATURE_PREFIX: &str = "feature";
/// Prefix of generated names for unnamed `y` columns.
pub const DEFAULT_LABEL_PREFIX: &str = "label";

/// One `(X, y)` pair submitted for recording. `None` marks an argument that
/// was not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceBatch {
    /// Feature matrix.
    pub x: Option<BatchInput>,
    /// Labels or predictions.
    pub y: Option<BatchInput>,
}

impl InferenceBatch {
    /// Batch with both arguments supplied.
    pub fn new(x: impl Into<BatchInput>, y: impl Into<BatchInput>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
        }
    }

    /// Read a `{"X": .., "y": ..}` payload. Absent keys stay unsupplied; a
    /// present `null` is supplied with kind `None`. Non-object payloads supply
    /// nothing.
    pub fn from_json(payload: &Value) -> Self {
        let argument = |name: &str| payload.get(name).map(BatchInput::from_json);
        Self {
            x: argument("X"),
            y: argument("y"),
        }
    }
}

/// Builds telemetry records against a borrowed [`MonitorConfig`].
///
/// The column lists are read from the config on every call.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    config: &'a MonitorConfig,
}

impl<'a> RecordBuilder<'a> {
    /// Builder for `config`.
    pub const fn new(config: &'a MonitorConfig) -> Self {
        Self { config }
    }

    /// Validate the batch and assemble one record per row.
    pub fn build(
        &self,
        x: Option<&BatchInput>,
        y: Option<&BatchInput>,
    ) -> Result<RecordBatch, ValidationError> {
        let (x, y) = match (x, y) {
            (Some(x), Some(y)) => (x, y),
            (None, None) => return Err(ValidationError::Missing(MissingArguments::Both)),
            (None, Some(_)) => return Err(ValidationError::Missing(MissingArguments::X)),
            (Some(_), None) => return Err(ValidationError::Missing(MissingArguments::Y)),
        };

        let x = tabular(x, BatchArgument::X)?;
        if x.ndim() != 2 {
            return Err(ValidationError::NotTwoDimensional { ndim: x.ndim() });
        }
        let y = tabular(y, BatchArgument::Y)?;

        if x.row_count() != y.row_count() {
            return Err(ValidationError::LengthMismatch {
                x_rows: x.row_count(),
                y_rows: y.row_count(),
            });
        }

        let feature_columns =
            resolve_columns(x, self.config.features_columns(), BatchArgument::X)?;
        let label_columns = resolve_columns(y, self.config.labels_columns(), BatchArgument::Y)?;

        let records = (0..x.row_count())
            .map(|row| self.assemble_row(row, x, &feature_columns, y, &label_columns))
            .collect();

        Ok(RecordBatch {
            records,
            feature_columns,
            label_columns,
        })
    }

    /// Validate and build an [`InferenceBatch`].
    pub fn build_batch(&self, batch: &InferenceBatch) -> Result<RecordBatch, ValidationError> {
        self.build(batch.x.as_ref(), batch.y.as_ref())
    }

    fn assemble_row(
        &self,
        row: usize,
        x: &dyn Tabular,
        feature_columns: &[String],
        y: &dyn Tabular,
        label_columns: &[String],
    ) -> TelemetryRecord {
        let metadata = self.config.metadata();
        let mut record =
            TelemetryRecord::with_capacity(metadata.len() + feature_columns.len() + label_columns.len());
        for (key, value) in metadata {
            record.insert(key.clone(), value.clone());
        }
        for (column, name) in feature_columns.iter().enumerate() {
            record.insert(name.clone(), x.value_at(row, column).unwrap_or(FieldValue::Null));
        }
        for (column, name) in label_columns.iter().enumerate() {
            record.insert(name.clone(), y.value_at(row, column).unwrap_or(FieldValue::Null));
        }
        record
    }
}

/// Validate a batch and return its records in row order.
///
/// ```
/// use mlpm_domain::{BatchInput, MonitorConfig, build_records};
/// use serde_json::json;
///
/// let mut config = MonitorConfig::new("NRII-key", "iris", None)?;
/// config.set_features_columns(["sepal", "petal"]);
///
/// let x = BatchInput::from_json(&json!([[5.1, 1.4], [6.2, 4.5]]));
/// let y = BatchInput::from_json(&json!([0, 1]));
/// let records = build_records(&config, Some(&x), Some(&y))?;
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].keys().collect::<Vec<_>>(), ["sepal", "petal", "label_0"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_records(
    config: &MonitorConfig,
    x: Option<&BatchInput>,
    y: Option<&BatchInput>,
) -> Result<Vec<TelemetryRecord>, ValidationError> {
    RecordBuilder::new(config)
        .build(x, y)
        .map(|batch| batch.records)
}

/// Positional names for `count` unnamed columns of `argument`.
///
/// ```
/// use mlpm_domain::{BatchArgument, default_column_names};
///
/// assert_eq!(default_column_names(BatchArgument::Y, 2), ["label_0", "label_1"]);
/// ```
pub fn default_column_names(argument: BatchArgument, count: usize) -> Vec<String> {
    let prefix = match argument {
        BatchArgument::X => DEFAULT_FEATURE_PREFIX,
        BatchArgument::Y => DEFAULT_LABEL_PREFIX,
    };
    (0..count).map(|index| format!("{prefix}_{index}")).collect()
}

fn tabular(input: &BatchInput, argument: BatchArgument) -> Result<&dyn Tabular, ValidationError> {
    match input {
        BatchInput::Frame(frame) => Ok(frame),
        BatchInput::Array(array) => Ok(array),
        BatchInput::Unsupported(kind) => Err(ValidationError::InvalidType {
            argument,
            kind: *kind,
        }),
    }
}

fn resolve_columns(
    input: &dyn Tabular,
    declared: &[String],
    argument: BatchArgument,
) -> Result<Vec<String>, ValidationError> {
    let columns = input.column_count();
    if !declared.is_empty() {
        if declared.len() != columns {
            return Err(ValidationError::ColumnsMismatch {
                argument,
                columns,
                declared: declared.len(),
            });
        }
        return Ok(declared.to_vec());
    }
    Ok(input
        .column_names()
        .map_or_else(|| default_column_names(argument, columns), <[String]>::to_vec))
}
