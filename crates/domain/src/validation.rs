//! Per-call validation failures for inference batches and model metrics.

use crate::value::InputKind;
use mlpm_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// The two arguments of a recording call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchArgument {
    /// Feature matrix.
    X,
    /// Labels or predictions.
    Y,
}

impl BatchArgument {
    /// Argument name as the caller spells it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "y",
        }
    }

    /// Name of the configured column list reconciled against this argument.
    pub const fn columns_field(self) -> &'static str {
        match self {
            Self::X => "features_columns",
            Self::Y => "labels_columns",
        }
    }
}

impl fmt::Display for BatchArgument {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Which required batch arguments were not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingArguments {
    /// Only `X` is missing.
    X,
    /// Only `y` is missing.
    Y,
    /// Both are missing.
    Both,
}

/// Validation failures for a single recording call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required batch arguments were not supplied.
    Missing(MissingArguments),
    /// A batch argument is neither a data frame nor a numeric array.
    InvalidType {
        /// Offending argument.
        argument: BatchArgument,
        /// Kind of the value received.
        kind: InputKind,
    },
    /// `X` is a numeric array but not two-dimensional.
    NotTwoDimensional {
        /// Number of dimensions received.
        ndim: usize,
    },
    /// `X` and `y` row counts differ.
    LengthMismatch {
        /// Rows in `X`.
        x_rows: usize,
        /// Rows in `y`.
        y_rows: usize,
    },
    /// A declared column list does not match the argument's column count.
    ColumnsMismatch {
        /// Argument whose columns were reconciled.
        argument: BatchArgument,
        /// Columns present in the argument.
        columns: usize,
        /// Names declared in the column list.
        declared: usize,
    },
    /// The metrics argument is not a mapping.
    InvalidMetricsType {
        /// Kind of the value received.
        kind: InputKind,
    },
    /// A metric value is not a number.
    NonNumericMetric {
        /// Metric name.
        name: String,
    },
}

impl ValidationError {
    /// Name of the offending argument.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing(MissingArguments::X) | Self::NotTwoDimensional { .. } => "X",
            Self::Missing(MissingArguments::Y) => "y",
            Self::Missing(MissingArguments::Both) | Self::LengthMismatch { .. } => "X,y",
            Self::InvalidType { argument, .. } => argument.as_str(),
            Self::ColumnsMismatch { argument, .. } => argument.columns_field(),
            Self::InvalidMetricsType { .. } | Self::NonNumericMetric { .. } => "metrics",
        }
    }

    fn error_code(&self) -> ErrorCode {
        let code = match self {
            Self::Missing(_) => "missing_argument",
            Self::InvalidType { .. } => "invalid_input_type",
            Self::NotTwoDimensional { .. } => "invalid_dimensions",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::ColumnsMismatch { .. } => "columns_mismatch",
            Self::InvalidMetricsType { .. } => "invalid_metrics",
            Self::NonNumericMetric { .. } => "non_numeric_metric",
        };
        ErrorCode::new("validation", code)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(MissingArguments::Both) => {
                formatter.write_str("missing 2 required arguments: 'X' and 'y'")
            },
            Self::Missing(MissingArguments::X) => {
                formatter.write_str("missing 1 required argument: 'X'")
            },
            Self::Missing(MissingArguments::Y) => {
                formatter.write_str("missing 1 required argument: 'y'")
            },
            Self::InvalidType { argument, .. } => write!(
                formatter,
                "{argument} instance type must be pd.core.frame.DataFrame or np.ndarray"
            ),
            Self::NotTwoDimensional { .. } => formatter.write_str("X must be a 2-D array"),
            Self::LengthMismatch { .. } => formatter.write_str("X and y must have the same length"),
            Self::ColumnsMismatch { argument, .. } => write!(
                formatter,
                "{argument} columns number and {} list must have the same length",
                argument.columns_field()
            ),
            Self::InvalidMetricsType { .. } => {
                formatter.write_str("metrics instance type must be Dict[str, Any]")
            },
            Self::NonNumericMetric { name } => write!(formatter, "metric '{name}' must be numeric"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ErrorEnvelope {
    fn from(error: ValidationError) -> Self {
        let mut envelope =
            Self::expected(error.error_code(), error.to_string()).with_field(error.field());

        match error {
            ValidationError::Missing(_) => {},
            ValidationError::InvalidType { kind, .. }
            | ValidationError::InvalidMetricsType { kind } => {
                envelope = envelope.with_metadata("received", kind.as_str());
            },
            ValidationError::NotTwoDimensional { ndim } => {
                envelope = envelope.with_metadata("ndim", ndim.to_string());
            },
            ValidationError::LengthMismatch { x_rows, y_rows } => {
                envelope = envelope
                    .with_metadata("x_rows", x_rows.to_string())
                    .with_metadata("y_rows", y_rows.to_string());
            },
            ValidationError::ColumnsMismatch {
                columns, declared, ..
            } => {
                envelope = envelope
                    .with_metadata("columns", columns.to_string())
                    .with_metadata("declared", declared.to_string());
            },
            ValidationError::NonNumericMetric { name } => {
                envelope = envelope.with_metadata("metric", name);
            },
        }

        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_mirror_between_x_and_y() {
        let x = ValidationError::InvalidType {
            argument: BatchArgument::X,
            kind: InputKind::Int,
        };
        let y = ValidationError::InvalidType {
            argument: BatchArgument::Y,
            kind: InputKind::Str,
        };
        assert_eq!(
            x.to_string(),
            "X instance type must be pd.core.frame.DataFrame or np.ndarray"
        );
        assert_eq!(
            y.to_string(),
            "y instance type must be pd.core.frame.DataFrame or np.ndarray"
        );
    }

    #[test]
    fn columns_mismatch_names_the_column_list() {
        let error = ValidationError::ColumnsMismatch {
            argument: BatchArgument::Y,
            columns: 1,
            declared: 2,
        };
        assert_eq!(
            error.to_string(),
            "y columns number and labels_columns list must have the same length"
        );
        assert_eq!(error.field(), "labels_columns");
    }

    #[test]
    fn envelope_carries_code_field_and_counts() {
        let envelope = ErrorEnvelope::from(ValidationError::LengthMismatch {
            x_rows: 4,
            y_rows: 1,
        });
        assert_eq!(envelope.code, ErrorCode::new("validation", "length_mismatch"));
        assert_eq!(envelope.field(), Some("X,y"));
        assert_eq!(envelope.metadata.get("x_rows").map(String::as_str), Some("4"));
        assert_eq!(envelope.metadata.get("y_rows").map(String::as_str), Some("1"));
    }
}
