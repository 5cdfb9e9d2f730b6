//! CLI command handlers.

pub mod config;
pub mod info;
pub mod input;
pub mod metrics;
pub mod pipeline;
pub mod record;

pub use config::{run_config_check, run_config_schema};
pub use info::run_info;
pub use metrics::run_metrics;
pub use record::{RecordCommandInput, run_record};
