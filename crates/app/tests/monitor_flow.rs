//! End-to-end flow: settings, monitor facade, JSON-lines sink.

use mlpm_adapters::JsonLinesRecordSink;
use mlpm_app::{PerformanceMonitor, RecordDeps, RecordOptions};
use mlpm_config::parse_settings_json;
use mlpm_domain::InferenceBatch;
use mlpm_ports::RecordSinkPort;
use serde_json::{Value, json};
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Result<Vec<Value>, Box<dyn Error>> {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(String::from_utf8(bytes)?
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn monitor_from_settings(
    settings: &str,
    buffer: &SharedBuffer,
) -> Result<PerformanceMonitor, Box<dyn Error>> {
    let settings = parse_settings_json(settings)?;
    let options = RecordOptions {
        send_data_metrics: settings.send_data_metrics(),
        data_summary_min_rows: usize::try_from(settings.data_summary_min_rows().get())?,
    };
    let sink: Arc<dyn RecordSinkPort> = Arc::new(JsonLinesRecordSink::new(buffer.clone()));
    Ok(PerformanceMonitor::new(
        settings.to_monitor_config()?,
        options,
        RecordDeps::new(sink),
    ))
}

#[test]
fn housing_batch_becomes_inference_and_summary_lines() -> Result<(), Box<dyn Error>> {
    let buffer = SharedBuffer::default();
    let monitor = monitor_from_settings(
        r#"{
            "insertKey": "NRII-flow",
            "modelName": "housing",
            "metadata": {"env": "staging", "dataset": "boston"},
            "featuresColumns": ["a", "b", "c", "d"],
            "labelsColumns": ["e"],
            "sendDataMetrics": true,
            "dataSummaryMinRows": 4
        }"#,
        &buffer,
    )?;

    let batch = InferenceBatch::from_json(&json!({
        "X": [[11, 12, 5, 2], [1, 15, 6, 10], [10, 8, 12, 5], [12, 15, 8, 6]],
        "y": [11, 12, 5, 2]
    }));
    let output = monitor.record_inference_data(&batch)?;
    assert_eq!(output.records, 4);
    assert!(output.data_metrics > 0);

    let lines = buffer.lines()?;
    let (inference, metrics): (Vec<&Value>, Vec<&Value>) = lines
        .iter()
        .partition(|line| line.get("eventType") == Some(&json!("InferenceData")));
    assert_eq!(inference.len(), 4);
    assert_eq!(metrics.len(), output.data_metrics);

    let first = inference.first().ok_or("missing inference line")?;
    assert_eq!(first.get("modelName"), Some(&json!("housing")));
    assert_eq!(first.get("env"), Some(&json!("staging")));
    assert_eq!(first.get("a"), Some(&json!(11)));
    assert_eq!(first.get("e"), Some(&json!(11)));

    let mean_a = metrics
        .iter()
        .find(|line| line.get("name") == Some(&json!("a.mean")))
        .ok_or("missing a.mean")?;
    assert_eq!(mean_a.get("value"), Some(&json!(8.5)));
    assert_eq!(mean_a.get("data_metric"), Some(&json!(true)));
    Ok(())
}

#[test]
fn rejected_batch_writes_nothing() -> Result<(), Box<dyn Error>> {
    let buffer = SharedBuffer::default();
    let monitor = monitor_from_settings(
        r#"{"insertKey": "NRII-flow", "modelName": "housing", "featuresColumns": ["a", "b", "c", "d", "e"]}"#,
        &buffer,
    )?;

    let batch = InferenceBatch::from_json(&json!({
        "X": [[11, 12, 5, 2]],
        "y": [11]
    }));
    let Err(error) = monitor.record_inference_data(&batch) else {
        return Err("five names for four columns must fail".into());
    };
    assert_eq!(
        error.message,
        "X columns number and features_columns list must have the same length"
    );
    assert!(buffer.lines()?.is_empty());
    Ok(())
}
