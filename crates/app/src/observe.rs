//! Log field and metric tag helpers shared by the use cases.

use mlpm_ports::{LogEvent, LogFields, LogLevel, LoggerPort, MetricTags, MetricsPort};
use mlpm_shared::ErrorEnvelope;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

pub fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub fn fields<const N: usize>(entries: [(&str, Value); N]) -> LogFields {
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect()
}

pub fn error_tags(error: &ErrorEnvelope) -> MetricTags {
    let mut tags = MetricTags::new();
    tags.insert("code".into(), error.code.to_string().into_boxed_str());
    tags
}

pub fn error_payload(error: &ErrorEnvelope) -> Value {
    serde_json::to_value(error.clone().redacted())
        .unwrap_or_else(|_| Value::String(error.to_string()))
}

/// Optional logger and metrics, so call sites stay flat.
#[derive(Clone, Copy)]
pub struct Observer<'a> {
    pub logger: Option<&'a Arc<dyn LoggerPort>>,
    pub metrics: Option<&'a Arc<dyn MetricsPort>>,
}

impl Observer<'_> {
    pub fn count(&self, name: &str, value: u64, tags: Option<&MetricTags>) {
        if let Some(metrics) = self.metrics {
            metrics.increment_counter(name, value, tags);
        }
    }

    pub fn info(&self, event: &str, message: &str, fields: LogFields) {
        if let Some(logger) = self.logger {
            logger.info(event, message, Some(fields));
        }
    }

    pub fn debug(&self, event: &str, message: &str, fields: LogFields) {
        if let Some(logger) = self.logger {
            logger.debug(event, message, Some(fields));
        }
    }

    pub fn failed(&self, event: &str, message: &str, fields: LogFields, error: &ErrorEnvelope) {
        if let Some(logger) = self.logger {
            logger.log(
                LogEvent::new(LogLevel::Error, event, message, Some(fields))
                    .with_error(error_payload(error)),
            );
        }
    }
}
