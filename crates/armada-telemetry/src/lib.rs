//! Observability bootstrap for the Armada service.
//!
//! This crate wires up the two ambient observability concerns the pipeline
//! relies on:
//!
//! - **Logging**: structured output via `tracing-subscriber` (JSON for
//!   production, pretty for development). The audit stage emits its records
//!   through `tracing`, so audit logs and diagnostics share one sink.
//! - **Metrics**: Prometheus-format counters via the `metrics` crate,
//!   notably `armada_audit_sink_failures_total`. A lost audit entry must
//!   never fail a request, so it surfaces here instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use armada_telemetry::logging::{LogConfig, init_logging};
//! use armada_telemetry::metrics::{MetricsConfig, init_metrics};
//!
//! init_logging(&LogConfig::production())?;
//! init_metrics(&MetricsConfig::default())?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, MetricsConfig, MetricsRegistry};
