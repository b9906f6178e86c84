//! Error types for the Armada pipeline.
//!
//! This module provides the [`ArmadaError`] type used throughout the
//! pipeline crates. The taxonomy is deliberately small: the pipeline is
//! single-pass header processing, so most conditions degrade gracefully
//! instead of erroring. The one caller-visible failure is
//! [`ArmadaError::MalformedTrustData`]: a confirmed identity without a
//! roles header means the reverse proxy is misconfigured, and defaulting to
//! an empty role set could hand out unintended privileges downstream.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ArmadaError`].
pub type ArmadaResult<T> = Result<T, ArmadaError>;

/// Standard error type for the Armada pipeline.
///
/// # Example
///
/// ```
/// use armada_core::ArmadaError;
///
/// let err = ArmadaError::malformed_trust_data("roles header absent");
/// assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Error, Debug)]
pub enum ArmadaError {
    /// The trust headers are internally inconsistent, e.g. a confirmed
    /// identity arrived without a roles header. Surfaced to the caller as a
    /// server-side error because it indicates proxy misconfiguration.
    #[error("Malformed trust data: {message}")]
    MalformedTrustData {
        /// Human-readable error message.
        message: String,
    },

    /// A caller-supplied correlation marker is not a canonical UUID.
    /// Recovered locally: the marker stays unset and the request proceeds.
    #[error("Invalid correlation marker: {marker:?}")]
    InvalidCorrelationMarker {
        /// The rejected marker value.
        marker: String,
    },

    /// The audit log sink refused a record. Recovered locally: the entry
    /// may be lost but the response is still returned.
    #[error("Audit log sink failure: {message}")]
    LoggingSink {
        /// Human-readable error message.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ArmadaError {
    /// Creates a malformed-trust-data error.
    #[must_use]
    pub fn malformed_trust_data(message: impl Into<String>) -> Self {
        Self::MalformedTrustData {
            message: message.into(),
        }
    }

    /// Creates an invalid-correlation-marker error.
    #[must_use]
    pub fn invalid_correlation_marker(marker: impl Into<String>) -> Self {
        Self::InvalidCorrelationMarker {
            marker: marker.into(),
        }
    }

    /// Creates a logging-sink error.
    #[must_use]
    pub fn logging_sink(message: impl Into<String>) -> Self {
        Self::LoggingSink {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Malformed trust data is a 500-class failure: the caller did nothing
    /// wrong, the proxy in front of the service did.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedTrustData { .. }
            | Self::LoggingSink { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidCorrelationMarker { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedTrustData { .. } => "MALFORMED_TRUST_DATA",
            Self::InvalidCorrelationMarker { .. } => "INVALID_CORRELATION_MARKER",
            Self::LoggingSink { .. } => "LOGGING_SINK_FAILURE",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_trust_data_is_server_error() {
        let err = ArmadaError::malformed_trust_data("roles header absent on confirmed request");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "MALFORMED_TRUST_DATA");
        assert!(err.to_string().contains("roles header absent"));
    }

    #[test]
    fn test_invalid_marker_is_client_class() {
        let err = ArmadaError::invalid_correlation_marker("not-a-uuid");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("not-a-uuid"));
    }

    #[test]
    fn test_internal_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = ArmadaError::internal_with_source("sink write failed", io);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_envelope_serialization() {
        let err = ArmadaError::malformed_trust_data("roles header absent");
        let envelope = err.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"MALFORMED_TRUST_DATA\""));
        assert!(json.contains("\"request_id\":\"req-456\""));
    }

    #[test]
    fn test_envelope_omits_absent_request_id() {
        let err = ArmadaError::internal("boom");
        let envelope = err.to_envelope(None);
        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(!json.contains("request_id"));
    }
}
