//! Common types used throughout the middleware pipeline.

use armada_core::ArmadaError;
use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type used in the middleware pipeline.
///
/// This is a standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware pipeline.
///
/// This is a standard `http::Response` with a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building error responses.
pub trait ResponseExt {
    /// Creates a plain-text error response with the given status and message.
    fn error(status: http::StatusCode, message: &str) -> Response;

    /// Creates a JSON error-envelope response from an [`ArmadaError`].
    ///
    /// The envelope carries the request ID so callers can correlate the
    /// failure with server-side audit entries.
    fn from_error(err: &ArmadaError, request_id: Option<&str>) -> Response;
}

impl ResponseExt for Response {
    fn error(status: http::StatusCode, message: &str) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(message.to_string())))
            .expect("failed to build error response")
    }

    fn from_error(err: &ArmadaError, request_id: Option<&str>) -> Response {
        let envelope = err.to_envelope(request_id);
        let body = serde_json::to_string(&envelope)
            .unwrap_or_else(|_| r#"{"error":{"code":"INTERNAL_ERROR","message":"error envelope serialization failed"}}"#.to_string());

        http::Response::builder()
            .status(err.status_code())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("failed to build JSON error response")
    }
}
