//! Scalar field values carried by telemetry records and metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Free-form tags merged into every record of a monitor.
pub type Metadata = BTreeMap<String, FieldValue>;

/// A single scalar cell or tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Convert a JSON value into a scalar field value.
    ///
    /// Arrays and objects are kept as their compact JSON text so records stay
    /// flat. Integers beyond the `i64` range fall back to floats.
    ///
    /// ```
    /// use mlpm_domain::FieldValue;
    /// use serde_json::json;
    ///
    /// assert_eq!(FieldValue::from_json(&json!(3)), FieldValue::Int(3));
    /// assert_eq!(FieldValue::from_json(&json!([1, 2])), FieldValue::Text("[1,2]".into()));
    /// ```
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }

    /// Convert back into a JSON value. Non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Int(number) => Value::from(*number),
            Self::Float(number) => serde_json::Number::from_f64(*number)
                .map_or(Value::Null, Value::Number),
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    /// Numeric view of the value. Booleans are not numeric.
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric summaries are computed in f64"
    )]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(number) => Some(*number as f64),
            Self::Float(number) => Some(*number),
            Self::Null | Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Returns true for `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Int(number) => write!(formatter, "{number}"),
            Self::Float(number) => write!(formatter, "{number}"),
            Self::Text(text) => formatter.write_str(text),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Kind of a dynamic input value, named the way monitored applications see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Integer scalar.
    Int,
    /// Floating point scalar.
    Float,
    /// String scalar.
    Str,
    /// Boolean scalar.
    Bool,
    /// Null / missing.
    None,
    /// A list that is not a numeric array.
    List,
    /// A mapping that is not a data frame.
    Dict,
}

impl InputKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(_) => Self::Bool,
            Value::Number(number) => {
                if number.is_f64() {
                    Self::Float
                } else {
                    Self::Int
                }
            },
            Value::String(_) => Self::Str,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Dict,
        }
    }

    /// Short type name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::None => "None",
            Self::List => "list",
            Self::Dict => "dict",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_map_one_to_one() {
        assert_eq!(FieldValue::from_json(&json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from_json(&json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from_json(&json!(-7)), FieldValue::Int(-7));
        assert_eq!(FieldValue::from_json(&json!(0.5)), FieldValue::Float(0.5));
        assert_eq!(
            FieldValue::from_json(&json!("prod")),
            FieldValue::Text("prod".to_string())
        );
    }

    #[test]
    fn nested_values_become_compact_json_text() {
        assert_eq!(
            FieldValue::from_json(&json!({"a": [1, 2]})),
            FieldValue::Text("{\"a\":[1,2]}".to_string())
        );
    }

    #[test]
    fn large_unsigned_numbers_fall_back_to_float() {
        let value = FieldValue::from_json(&json!(u64::MAX));
        assert!(matches!(value, FieldValue::Float(_)));
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert_eq!(FieldValue::Bool(true).as_f64(), None);
        assert_eq!(FieldValue::Int(2).as_f64(), Some(2.0));
    }

    #[test]
    fn serializes_untagged() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(vec![
            FieldValue::Null,
            FieldValue::Int(1),
            FieldValue::Text("a".to_string()),
        ])?;
        assert_eq!(value, json!([null, 1, "a"]));
        Ok(())
    }

    #[test]
    fn input_kinds_use_short_names() {
        assert_eq!(InputKind::of(&json!(1)).to_string(), "int");
        assert_eq!(InputKind::of(&json!(1.5)).to_string(), "float");
        assert_eq!(InputKind::of(&json!(null)).to_string(), "None");
        assert_eq!(InputKind::of(&json!({})).to_string(), "dict");
    }
}
