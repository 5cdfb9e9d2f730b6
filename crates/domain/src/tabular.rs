//! Tabular inference inputs.
//!
//! A batch argument is either a data frame (named columns, arbitrary scalar
//! cells) or a homogeneous numeric array (unnamed columns, 1-D or 2-D). Both
//! implement [`Tabular`], so the record builder is written once against that
//! interface. Anything else is kept as [`BatchInput::Unsupported`] so the
//! builder can report it in its fixed check order.

use crate::value::{FieldValue, InputKind};
use serde_json::{Map, Value};
use std::fmt;

/// Uniform read access over tabular inputs.
pub trait Tabular {
    /// Number of rows (samples).
    fn row_count(&self) -> usize;

    /// Number of columns. A 1-D array has a single column.
    fn column_count(&self) -> usize;

    /// Column names carried by the input, if any.
    fn column_names(&self) -> Option<&[String]>;

    /// Cell value at `(row, column)`, or `None` when out of bounds.
    fn value_at(&self, row: usize, column: usize) -> Option<FieldValue>;

    /// Number of dimensions.
    fn ndim(&self) -> usize {
        2
    }
}

/// Shape errors raised while constructing tabular inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabularError {
    /// A frame row does not have one cell per column.
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Number of columns declared by the frame.
        expected: usize,
        /// Number of cells found in the row.
        found: usize,
    },
    /// Flat array data does not fill the requested shape.
    ShapeMismatch {
        /// Number of values the shape requires.
        expected: usize,
        /// Number of values provided.
        found: usize,
    },
}

impl fmt::Display for TabularError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                formatter,
                "row {row} has {found} values but {expected} columns are declared"
            ),
            Self::ShapeMismatch { expected, found } => write!(
                formatter,
                "array shape requires {expected} values but {found} were provided"
            ),
        }
    }
}

impl std::error::Error for TabularError {}

/// Data frame with named columns and row-major cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl DataFrame {
    /// Build a frame, checking every row has one cell per column.
    pub fn try_new(columns: Vec<String>, rows: Vec<Vec<FieldValue>>) -> Result<Self, TabularError> {
        let expected = columns.len();
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(TabularError::RaggedRow {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Tabular for DataFrame {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_names(&self) -> Option<&[String]> {
        Some(&self.columns)
    }

    fn value_at(&self, row: usize, column: usize) -> Option<FieldValue> {
        self.rows.get(row)?.get(column).cloned()
    }
}

/// Homogeneous storage for numeric arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    /// Integer elements.
    Int(Vec<i64>),
    /// Floating point elements.
    Float(Vec<f64>),
}

impl NumericData {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
        }
    }

    /// Returns true when no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<FieldValue> {
        match self {
            Self::Int(values) => values.get(index).copied().map(FieldValue::Int),
            Self::Float(values) => values.get(index).copied().map(FieldValue::Float),
        }
    }

    /// Collect JSON numbers into homogeneous storage, upcasting to float when
    /// any element is not an integer. Returns `None` for non-numeric elements.
    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed integer and float arrays are upcast to float"
    )]
    fn from_json_numbers<'a>(values: impl Iterator<Item = &'a Value>) -> Option<Self> {
        let mut ints = Vec::new();
        let mut floats: Option<Vec<f64>> = None;
        for value in values {
            let Value::Number(number) = value else {
                return None;
            };
            if let (Some(int), None) = (number.as_i64(), &floats) {
                ints.push(int);
                continue;
            }
            let float = number.as_f64()?;
            floats
                .get_or_insert_with(|| ints.iter().map(|int| *int as f64).collect())
                .push(float);
        }
        Some(floats.map_or(Self::Int(ints), Self::Float))
    }
}

/// Numeric array with unnamed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    data: NumericData,
    rows: usize,
    columns: Option<usize>,
}

impl NumericArray {
    /// One-dimensional array; each element is one row.
    pub fn one_d(data: NumericData) -> Self {
        Self {
            rows: data.len(),
            data,
            columns: None,
        }
    }

    /// Two-dimensional array from row-major data.
    pub fn two_d(data: NumericData, rows: usize, columns: usize) -> Result<Self, TabularError> {
        let expected = rows.saturating_mul(columns);
        if data.len() != expected {
            return Err(TabularError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            data,
            rows,
            columns: Some(columns),
        })
    }

    /// Two-dimensional integer array from rows.
    pub fn from_int_rows(rows: Vec<Vec<i64>>) -> Result<Self, TabularError> {
        let (row_count, columns) = rectangular_shape(&rows)?;
        let data = NumericData::Int(rows.into_iter().flatten().collect());
        Self::two_d(data, row_count, columns)
    }

    /// Two-dimensional float array from rows.
    pub fn from_float_rows(rows: Vec<Vec<f64>>) -> Result<Self, TabularError> {
        let (row_count, columns) = rectangular_shape(&rows)?;
        let data = NumericData::Float(rows.into_iter().flatten().collect());
        Self::two_d(data, row_count, columns)
    }

    /// Array shape: `(rows,)` or `(rows, columns)`.
    pub fn shape(&self) -> (usize, Option<usize>) {
        (self.rows, self.columns)
    }

    /// Underlying element storage.
    pub const fn data(&self) -> &NumericData {
        &self.data
    }
}

fn rectangular_shape<T>(rows: &[Vec<T>]) -> Result<(usize, usize), TabularError> {
    let columns = rows.first().map_or(0, Vec::len);
    if let Some((row, cells)) = rows
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != columns)
    {
        return Err(TabularError::RaggedRow {
            row,
            expected: columns,
            found: cells.len(),
        });
    }
    Ok((rows.len(), columns))
}

impl Tabular for NumericArray {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.columns.unwrap_or(1)
    }

    fn column_names(&self) -> Option<&[String]> {
        None
    }

    fn value_at(&self, row: usize, column: usize) -> Option<FieldValue> {
        if row >= self.rows || column >= self.column_count() {
            return None;
        }
        let index = row.checked_mul(self.column_count())?.checked_add(column)?;
        self.data.get(index)
    }

    fn ndim(&self) -> usize {
        if self.columns.is_some() { 2 } else { 1 }
    }
}

/// One `X` or `y` argument as received from the monitored application.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchInput {
    /// Named-column data frame.
    Frame(DataFrame),
    /// Unnamed numeric array.
    Array(NumericArray),
    /// Any other value; only its kind is kept.
    Unsupported(InputKind),
}

impl BatchInput {
    /// Interpret a JSON value as a batch argument.
    ///
    /// - `{"columns": [..], "data": [[..], ..]}` (optional `index`) is a frame;
    /// - an array of numbers is a 1-D array, an array of equal-length number
    ///   arrays is a 2-D array;
    /// - everything else is unsupported.
    ///
    /// ```
    /// use mlpm_domain::{BatchInput, InputKind, Tabular};
    /// use serde_json::json;
    ///
    /// let input = BatchInput::from_json(&json!([[1, 2], [3, 4.5]]));
    /// let table = input.as_tabular().map(|t| (t.row_count(), t.column_count()));
    /// assert_eq!(table, Some((2, 2)));
    ///
    /// assert_eq!(BatchInput::from_json(&json!(3)), BatchInput::Unsupported(InputKind::Int));
    /// ```
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(object) => frame_from_json(object)
                .map_or(Self::Unsupported(InputKind::Dict), Self::Frame),
            Value::Array(items) => {
                array_from_json(items).map_or(Self::Unsupported(InputKind::List), Self::Array)
            },
            other => Self::Unsupported(InputKind::of(other)),
        }
    }

    /// Tabular view for frames and arrays.
    pub fn as_tabular(&self) -> Option<&dyn Tabular> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::Array(array) => Some(array),
            Self::Unsupported(_) => None,
        }
    }
}

impl From<DataFrame> for BatchInput {
    fn from(frame: DataFrame) -> Self {
        Self::Frame(frame)
    }
}

impl From<NumericArray> for BatchInput {
    fn from(array: NumericArray) -> Self {
        Self::Array(array)
    }
}

fn frame_from_json(object: &Map<String, Value>) -> Option<DataFrame> {
    if object
        .keys()
        .any(|key| !matches!(key.as_str(), "columns" | "data" | "index"))
    {
        return None;
    }
    let columns = object
        .get("columns")?
        .as_array()?
        .iter()
        .map(|column| column.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()?;
    let rows = object
        .get("data")?
        .as_array()?
        .iter()
        .map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(FieldValue::from_json).collect())
        })
        .collect::<Option<Vec<_>>>()?;
    DataFrame::try_new(columns, rows).ok()
}

fn array_from_json(items: &[Value]) -> Option<NumericArray> {
    if items.iter().all(Value::is_number) {
        return NumericData::from_json_numbers(items.iter()).map(NumericArray::one_d);
    }
    let rows = items
        .iter()
        .map(Value::as_array)
        .collect::<Option<Vec<_>>>()?;
    let columns = rows.first().map_or(0, |row| row.len());
    if rows.iter().any(|row| row.len() != columns) {
        return None;
    }
    let data = NumericData::from_json_numbers(rows.iter().flat_map(|row| row.iter()))?;
    NumericArray::two_d(data, rows.len(), columns).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frame_requires_rectangular_rows() {
        let error = DataFrame::try_new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![FieldValue::Int(1)]],
        )
        .err();
        assert_eq!(
            error,
            Some(TabularError::RaggedRow {
                row: 0,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn one_d_array_has_single_column() {
        let array = NumericArray::one_d(NumericData::Int(vec![4, 5, 6]));
        assert_eq!(array.row_count(), 3);
        assert_eq!(array.column_count(), 1);
        assert_eq!(array.ndim(), 1);
        assert_eq!(array.value_at(2, 0), Some(FieldValue::Int(6)));
        assert_eq!(array.value_at(0, 1), None);
    }

    #[test]
    fn two_d_array_reads_row_major() -> Result<(), TabularError> {
        let array = NumericArray::from_int_rows(vec![vec![1, 2, 3], vec![4, 5, 6]])?;
        assert_eq!(array.shape(), (2, Some(3)));
        assert_eq!(array.value_at(1, 0), Some(FieldValue::Int(4)));
        assert_eq!(array.value_at(0, 2), Some(FieldValue::Int(3)));
        assert_eq!(array.value_at(2, 0), None);
        Ok(())
    }

    #[test]
    fn two_d_rejects_short_data() {
        let error = NumericArray::two_d(NumericData::Float(vec![1.0]), 2, 2).err();
        assert_eq!(
            error,
            Some(TabularError::ShapeMismatch {
                expected: 4,
                found: 1
            })
        );
    }

    #[test]
    fn json_mixed_numbers_upcast_to_float() {
        let input = BatchInput::from_json(&json!([1, 2.5, 3]));
        let BatchInput::Array(array) = input else {
            unreachable!("numeric list must parse as an array");
        };
        assert_eq!(array.data(), &NumericData::Float(vec![1.0, 2.5, 3.0]));
    }

    #[test]
    fn json_empty_list_is_empty_one_d_array() {
        let input = BatchInput::from_json(&json!([]));
        let shape = match input {
            BatchInput::Array(array) => Some(array.shape()),
            _ => None,
        };
        assert_eq!(shape, Some((0, None)));
    }

    #[test]
    fn json_frame_keeps_column_names() {
        let input = BatchInput::from_json(&json!({
            "columns": ["a", "b"],
            "index": [10, 11],
            "data": [[1, "x"], [2, null]]
        }));
        let Some(table) = input.as_tabular() else {
            unreachable!("frame payload must parse as a frame");
        };
        assert_eq!(
            table.column_names(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(table.value_at(1, 1), Some(FieldValue::Null));
    }

    #[test]
    fn json_unsupported_shapes_report_their_kind() {
        assert_eq!(
            BatchInput::from_json(&json!(["a", "b"])),
            BatchInput::Unsupported(InputKind::List)
        );
        assert_eq!(
            BatchInput::from_json(&json!([[1, 2], [3]])),
            BatchInput::Unsupported(InputKind::List)
        );
        assert_eq!(
            BatchInput::from_json(&json!([true, false])),
            BatchInput::Unsupported(InputKind::List)
        );
        assert_eq!(
            BatchInput::from_json(&json!({"a": 1})),
            BatchInput::Unsupported(InputKind::Dict)
        );
        assert_eq!(
            BatchInput::from_json(&json!("text")),
            BatchInput::Unsupported(InputKind::Str)
        );
    }
}
