//! Flat telemetry records, one per observation.

use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::Serialize;

/// Ordered field name to scalar mapping for one row of a batch.
///
/// Insertion order is kept. Inserting an existing key replaces its value in
/// place, so a feature named like a metadata tag overwrites the tag.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TelemetryRecord {
    fields: IndexMap<String, FieldValue>,
}

impl TelemetryRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Records are equal when they hold the same fields in the same order.
impl PartialEq for TelemetryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fields.iter().eq(other.fields.iter())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for TelemetryRecord {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Records built from one batch plus the column names resolved for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    /// One record per input row, in row order.
    pub records: Vec<TelemetryRecord>,
    /// Names used for the columns of `X`.
    pub feature_columns: Vec<String>,
    /// Names used for the columns of `y`.
    pub label_columns: Vec<String>,
}

impl RecordBatch {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the batch has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature then label column names, without repeats.
    pub fn data_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for name in self.feature_columns.iter().chain(&self.label_columns) {
            if !columns.contains(&name.as_str()) {
                columns.push(name);
            }
        }
        columns
    }

    /// Values of one column across all records, in row order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a FieldValue> {
        self.records.iter().filter_map(move |record| record.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut record = TelemetryRecord::new();
        record.insert("env", FieldValue::from("prod"));
        record.insert("a", FieldValue::Int(1));
        record.insert("env", FieldValue::Int(9));

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["env", "a"]);
        assert_eq!(record.get("env"), Some(&FieldValue::Int(9)));
    }

    #[test]
    fn serializes_as_ordered_object() -> Result<(), serde_json::Error> {
        let record: TelemetryRecord = [("b", FieldValue::Int(2)), ("a", FieldValue::Null)]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&record)?, r#"{"b":2,"a":null}"#);
        Ok(())
    }

    #[test]
    fn equality_depends_on_field_order() {
        let forward: TelemetryRecord = [("a", FieldValue::Int(1)), ("b", FieldValue::Int(2))]
            .into_iter()
            .collect();
        let backward: TelemetryRecord = [("b", FieldValue::Int(2)), ("a", FieldValue::Int(1))]
            .into_iter()
            .collect();
        assert_ne!(forward, backward);
        assert_eq!(forward, forward.clone());
    }

    #[test]
    fn wide_records_keep_every_column_in_order() {
        let width = 20_000;
        let record: TelemetryRecord = (0..width)
            .map(|index| (format!("feature_{index}"), FieldValue::Int(index)))
            .collect();
        assert_eq!(record.len(), 20_000);
        assert_eq!(record.keys().next(), Some("feature_0"));
        assert_eq!(record.keys().last(), Some("feature_19999"));
        assert_eq!(record.get("feature_12345"), Some(&FieldValue::Int(12_345)));
    }

    #[test]
    fn data_columns_skip_repeats() {
        let batch = RecordBatch {
            records: Vec::new(),
            feature_columns: vec!["a".to_string(), "b".to_string()],
            label_columns: vec!["b".to_string(), "c".to_string()],
        };
        assert_eq!(batch.data_columns(), vec!["a", "b", "c"]);
    }
}
