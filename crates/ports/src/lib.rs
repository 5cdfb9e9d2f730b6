//! # mlpm-ports
//!
//! Port traits for the ml-perf-monitor hexagonal architecture.
//!
//! This crate defines the interfaces between the domain and infrastructure
//! layers. It depends only on `domain` and `shared`. All ports are
//! synchronous: recording never suspends, and transmitters are free to queue
//! behind the record sink.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod metrics;
pub mod records;

pub use logger::*;
pub use metrics::*;
pub use records::*;

// Re-export the record types used in port signatures, so adapter crates can
// implement ports without directly depending on `mlpm-domain`.
pub use mlpm_domain::{FieldValue, MetricRecord, TelemetryRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use mlpm_domain::domain_crate_version;
    use mlpm_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut deps = Vec::new();
        let mut in_deps = false;

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                in_deps = line == "[dependencies]" || line == "[dev-dependencies]";
                continue;
            }
            if in_deps && line.starts_with("mlpm-") {
                let key = line.split('=').next().unwrap_or("").trim();
                deps.push(key.split('.').next().unwrap_or("").trim().to_string());
            }
        }

        deps
    }

    #[test]
    fn ports_depends_only_on_domain_and_shared() {
        let deps = workspace_deps();
        let allowed = ["mlpm-domain", "mlpm-shared"];

        for dep in &deps {
            assert!(
                allowed.contains(&dep.as_str()),
                "unexpected dependency found: {dep}"
            );
        }
        for expected in allowed {
            assert!(
                deps.iter().any(|dep| dep == expected),
                "missing dependency: {expected}"
            );
        }
    }

    #[test]
    fn ports_can_use_domain_and_shared() {
        assert!(!ports_crate_version().is_empty());
        assert!(!domain_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }

    #[test]
    fn ports_are_object_safe() {
        fn accepts(_: Option<&dyn RecordSinkPort>, _: Option<&dyn LoggerPort>, _: Option<&dyn MetricsPort>) {}
        accepts(None, None, None);
    }
}
