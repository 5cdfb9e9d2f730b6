//! Record sink boundary contract.
//!
//! The sink receives fully-built records and owns everything after that:
//! batching, serialization, authentication and delivery.

use mlpm_domain::{MetricRecord, TelemetryRecord};
use mlpm_shared::Result;

/// Boundary contract for handing records to a transmitter.
pub trait RecordSinkPort: Send + Sync {
    /// Hand over the inference records of one batch, in row order.
    fn send_inference_records(&self, model_name: &str, records: &[TelemetryRecord]) -> Result<()>;

    /// Hand over model or data-summary metrics.
    fn send_metric_records(&self, model_name: &str, records: &[MetricRecord]) -> Result<()>;
}
