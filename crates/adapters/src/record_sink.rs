//! Record sink adapters: JSON lines and in-memory capture.

use crate::logger::now_epoch_ms;
use mlpm_domain::{FieldValue, MetricRecord, TelemetryRecord};
use mlpm_ports::RecordSinkPort;
use mlpm_shared::{ErrorEnvelope, Result};
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Event type of inference records.
pub const INFERENCE_EVENT_TYPE: &str = "InferenceData";
/// Event type of metric records.
pub const METRIC_EVENT_TYPE: &str = "MetricData";

/// Writes one JSON object per record to a writer.
///
/// Inference lines carry `eventType`, `modelName`, a random `inferenceId` and
/// `timestampMs` next to the record fields. Metric lines carry `eventType`,
/// `modelName`, `name`, `value` and `timestampMs` next to the attributes. A
/// record field named like one of these keys is dropped from the line.
#[derive(Debug)]
pub struct JsonLinesRecordSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesRecordSink<W> {
    /// Sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lines(&self, lines: impl Iterator<Item = Map<String, Value>>) -> Result<()> {
        let mut buffer = Vec::new();
        for line in lines {
            serde_json::to_writer(&mut buffer, &Value::Object(line))
                .map_err(|error| ErrorEnvelope::from(std::io::Error::from(error)))?;
            buffer.push(b'\n');
        }

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer
            .write_all(&buffer)
            .and_then(|()| writer.flush())
            .map_err(|error| ErrorEnvelope::from(error).with_metadata("sink", "json_lines"))
    }
}

impl<W: Write + Send> RecordSinkPort for JsonLinesRecordSink<W> {
    fn send_inference_records(&self, model_name: &str, records: &[TelemetryRecord]) -> Result<()> {
        let timestamp_ms = now_epoch_ms();
        self.write_lines(records.iter().map(|record| {
            let mut line = Map::new();
            line.insert("eventType".to_string(), Value::from(INFERENCE_EVENT_TYPE));
            line.insert("modelName".to_string(), Value::from(model_name));
            line.insert(
                "inferenceId".to_string(),
                Value::from(Uuid::new_v4().to_string()),
            );
            line.insert("timestampMs".to_string(), Value::from(timestamp_ms));
            merge_fields(&mut line, record.iter());
            line
        }))
    }

    fn send_metric_records(&self, model_name: &str, records: &[MetricRecord]) -> Result<()> {
        let timestamp_ms = now_epoch_ms();
        self.write_lines(records.iter().map(|metric| {
            let mut line = Map::new();
            line.insert("eventType".to_string(), Value::from(METRIC_EVENT_TYPE));
            line.insert("modelName".to_string(), Value::from(model_name));
            line.insert("name".to_string(), Value::from(metric.name.as_str()));
            line.insert(
                "value".to_string(),
                FieldValue::Float(metric.value).to_json(),
            );
            line.insert("timestampMs".to_string(), Value::from(timestamp_ms));
            merge_fields(
                &mut line,
                metric
                    .attributes
                    .iter()
                    .map(|(key, value)| (key.as_str(), value)),
            );
            line
        }))
    }
}

fn merge_fields<'a>(
    line: &mut Map<String, Value>,
    fields: impl Iterator<Item = (&'a str, &'a FieldValue)>,
) {
    for (key, value) in fields {
        line.entry(key).or_insert_with(|| value.to_json());
    }
}

/// One call to [`RecordSinkPort::send_inference_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSubmission {
    /// Model the records belong to.
    pub model_name: String,
    /// Records in row order.
    pub records: Vec<TelemetryRecord>,
}

/// One call to [`RecordSinkPort::send_metric_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSubmission {
    /// Model the metrics belong to.
    pub model_name: String,
    /// Metric records.
    pub records: Vec<MetricRecord>,
}

#[derive(Debug, Default)]
struct Captured {
    inference: Vec<InferenceSubmission>,
    metrics: Vec<MetricSubmission>,
}

/// Sink keeping every submission in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordSink {
    captured: Mutex<Captured>,
    failure: Option<ErrorEnvelope>,
}

impl MemoryRecordSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink rejecting every submission with `error`.
    #[must_use]
    pub fn failing(error: ErrorEnvelope) -> Self {
        Self {
            captured: Mutex::default(),
            failure: Some(error),
        }
    }

    /// Inference submissions in call order.
    pub fn inference_submissions(&self) -> Vec<InferenceSubmission> {
        self.lock().inference.clone()
    }

    /// Metric submissions in call order.
    pub fn metric_submissions(&self) -> Vec<MetricSubmission> {
        self.lock().metrics.clone()
    }

    /// Every inference record received, across submissions.
    pub fn inference_records(&self) -> Vec<TelemetryRecord> {
        self.lock()
            .inference
            .iter()
            .flat_map(|submission| submission.records.iter().cloned())
            .collect()
    }

    /// Every metric record received, across submissions.
    pub fn metric_records(&self) -> Vec<MetricRecord> {
        self.lock()
            .metrics
            .iter()
            .flat_map(|submission| submission.records.iter().cloned())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Captured> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<()> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

impl RecordSinkPort for MemoryRecordSink {
    fn send_inference_records(&self, model_name: &str, records: &[TelemetryRecord]) -> Result<()> {
        self.check()?;
        self.lock().inference.push(InferenceSubmission {
            model_name: model_name.to_owned(),
            records: records.to_vec(),
        });
        Ok(())
    }

    fn send_metric_records(&self, model_name: &str, records: &[MetricRecord]) -> Result<()> {
        self.check()?;
        self.lock().metrics.push(MetricSubmission {
            model_name: model_name.to_owned(),
            records: records.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlpm_domain::MonitorConfig;
    use mlpm_shared::ErrorCode;
    use serde_json::json;
    use std::error::Error;

    fn record(pairs: &[(&str, FieldValue)]) -> TelemetryRecord {
        pairs
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }

    fn parse_lines(bytes: &[u8]) -> Result<Vec<Value>, Box<dyn Error>> {
        Ok(std::str::from_utf8(bytes)?
            .lines()
            .map(serde_json::from_str)
            .collect::<std::result::Result<_, _>>()?)
    }

    #[test]
    fn inference_lines_carry_envelope_and_fields() -> Result<(), Box<dyn Error>> {
        let sink = JsonLinesRecordSink::new(Vec::new());
        let records = [
            record(&[("env", FieldValue::from("prod")), ("a", FieldValue::Int(1))]),
            record(&[("env", FieldValue::from("prod")), ("a", FieldValue::Float(f64::NAN))]),
        ];
        sink.send_inference_records("housing", &records)?;

        let lines = parse_lines(&sink.into_inner())?;
        assert_eq!(lines.len(), 2);
        let first = lines.first().ok_or("missing first line")?;
        let second = lines.get(1).ok_or("missing second line")?;
        assert_eq!(first.get("eventType"), Some(&json!("InferenceData")));
        assert_eq!(first.get("modelName"), Some(&json!("housing")));
        assert_eq!(first.get("a"), Some(&json!(1)));
        assert_eq!(second.get("a"), Some(&Value::Null));

        let first_id = first.get("inferenceId").and_then(Value::as_str);
        let second_id = second.get("inferenceId").and_then(Value::as_str);
        assert!(first_id.is_some_and(|id| Uuid::parse_str(id).is_ok()));
        assert_ne!(first_id, second_id);
        Ok(())
    }

    #[test]
    fn inference_lines_keep_record_field_order() -> Result<(), Box<dyn Error>> {
        let sink = JsonLinesRecordSink::new(Vec::new());
        let row = record(&[
            ("zone", FieldValue::from("eu")),
            ("b", FieldValue::Int(2)),
            ("a", FieldValue::Int(1)),
        ]);
        sink.send_inference_records("housing", &[row])?;

        let lines = parse_lines(&sink.into_inner())?;
        let keys: Vec<&str> = lines
            .first()
            .and_then(Value::as_object)
            .ok_or("missing line")?
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            ["eventType", "modelName", "inferenceId", "timestampMs", "zone", "b", "a"]
        );
        Ok(())
    }

    #[test]
    fn reserved_keys_are_not_overwritten() -> Result<(), Box<dyn Error>> {
        let sink = JsonLinesRecordSink::new(Vec::new());
        sink.send_inference_records("housing", &[record(&[("modelName", FieldValue::from("x"))])])?;
        let lines = parse_lines(&sink.into_inner())?;
        let line = lines.first().ok_or("missing line")?;
        assert_eq!(line.get("modelName"), Some(&json!("housing")));
        Ok(())
    }

    #[test]
    fn metric_lines_carry_name_value_and_attributes() -> Result<(), Box<dyn Error>> {
        let config = MonitorConfig::new("NRII-key", "iris", None)?;
        let sink = JsonLinesRecordSink::new(Vec::new());
        sink.send_metric_records("iris", &[MetricRecord::new("accuracy", 0.9, &config, false)])?;

        let lines = parse_lines(&sink.into_inner())?;
        let line = lines.first().ok_or("missing line")?;
        assert_eq!(line.get("eventType"), Some(&json!("MetricData")));
        assert_eq!(line.get("name"), Some(&json!("accuracy")));
        assert_eq!(line.get("value"), Some(&json!(0.9)));
        assert_eq!(line.get("data_metric"), Some(&json!(false)));
        Ok(())
    }

    #[test]
    fn memory_sink_keeps_submissions() -> Result<(), Box<dyn Error>> {
        let sink = MemoryRecordSink::new();
        sink.send_inference_records("iris", &[record(&[("a", FieldValue::Int(1))])])?;
        sink.send_inference_records("iris", &[record(&[("a", FieldValue::Int(2))])])?;

        assert_eq!(sink.inference_submissions().len(), 2);
        assert_eq!(sink.inference_records().len(), 2);
        assert!(sink.metric_records().is_empty());
        Ok(())
    }

    #[test]
    fn failing_sink_rejects_and_keeps_nothing() {
        let error = ErrorEnvelope::expected(ErrorCode::io(), "sink offline");
        let sink = MemoryRecordSink::failing(error.clone());

        assert_eq!(sink.send_metric_records("iris", &[]), Err(error));
        assert!(sink.metric_submissions().is_empty());
    }
}
