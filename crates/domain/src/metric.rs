//! Model metric records.

use crate::monitor::MonitorConfig;
use crate::validation::ValidationError;
use crate::value::{FieldValue, InputKind};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute marking whether a metric was derived from batch data.
pub const DATA_METRIC_ATTRIBUTE: &str = "data_metric";

/// A named numeric measurement sent alongside inference records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    /// Metric name.
    pub name: String,
    /// Metric value.
    pub value: f64,
    /// Metadata tags plus the data-metric marker.
    pub attributes: BTreeMap<String, FieldValue>,
}

impl MetricRecord {
    /// Metric tagged with the monitor's metadata.
    pub fn new(name: impl Into<String>, value: f64, config: &MonitorConfig, data_metric: bool) -> Self {
        let mut attributes = config.metadata().clone();
        attributes.insert(DATA_METRIC_ATTRIBUTE.to_owned(), FieldValue::Bool(data_metric));
        Self {
            name: name.into(),
            value,
            attributes,
        }
    }

    /// Returns true for metrics summarizing batch data.
    pub fn is_data_metric(&self) -> bool {
        matches!(
            self.attributes.get(DATA_METRIC_ATTRIBUTE),
            Some(FieldValue::Bool(true))
        )
    }
}

/// Validate a `name -> number` mapping of model metrics.
///
/// ```
/// use mlpm_domain::{MonitorConfig, build_metric_records};
/// use serde_json::json;
///
/// let config = MonitorConfig::new("NRII-key", "iris", None)?;
/// let metrics = build_metric_records(&config, &json!({"accuracy": 0.93}))?;
/// assert_eq!(metrics[0].name, "accuracy");
/// assert!(!metrics[0].is_data_metric());
///
/// let error = build_metric_records(&config, &json!([0.93])).err();
/// assert_eq!(
///     error.map(|error| error.to_string()).as_deref(),
///     Some("metrics instance type must be Dict[str, Any]")
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_metric_records(
    config: &MonitorConfig,
    metrics: &Value,
) -> Result<Vec<MetricRecord>, ValidationError> {
    let Value::Object(entries) = metrics else {
        return Err(ValidationError::InvalidMetricsType {
            kind: InputKind::of(metrics),
        });
    };
    entries
        .iter()
        .map(|(name, value)| {
            value
                .as_f64()
                .map(|value| MetricRecord::new(name.clone(), value, config, false))
                .ok_or_else(|| ValidationError::NonNumericMetric { name: name.clone() })
        })
        .collect()
}
