//! Column summaries of a recorded batch, reported as data metrics.

use crate::metric::MetricRecord;
use crate::monitor::MonitorConfig;
use crate::record::RecordBatch;
use crate::value::FieldValue;
use serde::Serialize;
use std::collections::BTreeSet;

/// Minimum number of rows before a batch is summarized, unless configured.
pub const DEFAULT_DATA_SUMMARY_MIN_ROWS: usize = 100;

/// Summary statistics of one column. Null cells are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColumnSummary {
    /// Every non-null cell is numeric.
    Numeric {
        /// Non-null cells.
        count: usize,
        /// Smallest value.
        min: f64,
        /// Largest value.
        max: f64,
        /// Arithmetic mean.
        mean: f64,
        /// Sample standard deviation; absent below two values.
        #[serde(skip_serializing_if = "Option::is_none")]
        std: Option<f64>,
    },
    /// Any other column, including all-null ones.
    Categorical {
        /// Non-null cells.
        count: usize,
        /// Distinct non-null cells.
        unique: usize,
    },
}

impl ColumnSummary {
    /// Summarize a column.
    ///
    /// ```
    /// use mlpm_domain::{ColumnSummary, FieldValue};
    ///
    /// let values = [FieldValue::Int(1), FieldValue::Null, FieldValue::Int(3)];
    /// let ColumnSummary::Numeric { count, mean, .. } = ColumnSummary::from_values(&values) else {
    ///     unreachable!();
    /// };
    /// assert_eq!(count, 2);
    /// assert!((mean - 2.0).abs() < f64::EPSILON);
    /// ```
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a FieldValue>) -> Self {
        let present: Vec<&FieldValue> = values.into_iter().filter(|value| !value.is_null()).collect();
        let numbers: Option<Vec<f64>> = present.iter().map(|value| value.as_f64()).collect();
        match numbers {
            Some(numbers) if !numbers.is_empty() => numeric_summary(&numbers),
            _ => {
                let unique: BTreeSet<String> =
                    present.iter().map(|value| format!("{value:?}")).collect();
                Self::Categorical {
                    count: present.len(),
                    unique: unique.len(),
                }
            },
        }
    }

    /// Statistic names and values, in reporting order.
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts are reported as metric values"
    )]
    pub fn statistics(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Self::Numeric {
                count,
                min,
                max,
                mean,
                std,
            } => {
                let mut statistics = vec![
                    ("count", count as f64),
                    ("min", min),
                    ("max", max),
                    ("mean", mean),
                ];
                if let Some(std) = std {
                    statistics.push(("std", std));
                }
                statistics
            },
            Self::Categorical { count, unique } => {
                vec![("count", count as f64), ("unique", unique as f64)]
            },
        }
    }
}

fn numeric_summary(numbers: &[f64]) -> ColumnSummary {
    let mut seen = 0.0_f64;
    let mut mean = 0.0_f64;
    let mut squared_deviation = 0.0_f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &number in numbers {
        seen += 1.0;
        let delta = number - mean;
        mean += delta / seen;
        squared_deviation += delta * (number - mean);
        min = min.min(number);
        max = max.max(number);
    }
    let std = (numbers.len() >= 2).then(|| (squared_deviation / (seen - 1.0)).sqrt());
    ColumnSummary::Numeric {
        count: numbers.len(),
        min,
        max,
        mean,
        std,
    }
}

/// Summarize every resolved feature and label column of a batch.
pub fn summarize_batch(batch: &RecordBatch) -> Vec<(String, ColumnSummary)> {
    batch
        .data_columns()
        .into_iter()
        .map(|column| {
            let summary = ColumnSummary::from_values(batch.column_values(column));
            (column.to_owned(), summary)
        })
        .collect()
}

/// Data metrics named `<column>.<statistic>`, tagged with metadata and
/// `data_metric = true`.
pub fn summary_metric_records(config: &MonitorConfig, batch: &RecordBatch) -> Vec<MetricRecord> {
    summarize_batch(batch)
        .into_iter()
        .flat_map(|(column, summary)| {
            summary
                .statistics()
                .into_iter()
                .map(move |(statistic, value)| {
                    MetricRecord::new(format!("{column}.{statistic}"), value, config, true)
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
