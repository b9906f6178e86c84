//! Telemetry error types.

use thiserror::Error;

/// Result type alias using [`TelemetryError`].
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors that can occur during telemetry initialization.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Logging initialization failed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics initialization failed.
    #[error("failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// An address in the configuration could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
