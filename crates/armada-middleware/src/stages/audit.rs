//! Audit logging middleware.
//!
//! This stage produces the audit-grade record of every request/response
//! pair. It wraps the handler: the inbound side logs the request and its
//! headers, the outbound side decorates the response with the correlation
//! header and logs the outcome.
//!
//! ## Redaction
//!
//! Request headers whose names start with `x-` (case-insensitive) carry
//! trust and identity material written by the reverse proxy. They are never
//! written to logs, at any level. This is a hard security invariant, not a
//! convenience filter, and it is deliberately not configurable.
//!
//! ## Health-check exclusion
//!
//! Requests whose path ends with the configured health-check suffix produce
//! no audit records at all, keeping liveness probes from flooding the logs.
//!
//! ## Failure semantics
//!
//! A sink that refuses a record never aborts the request. The failure is
//! counted on the `armada_audit_sink_failures_total` metric and the
//! response is returned to the caller regardless.
//!
//! ## Operational caveat
//!
//! The outbound side logs the full response body at debug level, without
//! redaction. Deployments handling sensitive payloads are expected to run
//! with debug logging disabled.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use http_body_util::{BodyExt, Full};
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

/// Response header carrying the request correlation ID.
pub const ARMADA_REQUEST_HEADER: &str = "x-armada-req";

/// Counter incremented when the audit sink refuses a record.
pub const AUDIT_SINK_FAILURES_METRIC: &str = "armada_audit_sink_failures_total";

/// Read-only audit configuration, built once at process start and shared
/// across all in-flight requests.
///
/// The exclusion patterns are compiled at construction and only matched
/// afterwards.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// The configured health-check path suffix.
    health_path: String,

    /// Matches request paths that produce no audit records.
    path_exclude: Regex,

    /// Matches header names that must never be logged.
    hdr_exclude: Regex,
}

impl AuditConfig {
    /// Creates an audit configuration with the given health-check path
    /// suffix (e.g. `"health"` excludes every path ending in `/health`).
    #[must_use]
    pub fn new(health_path: &str) -> Self {
        Self {
            health_path: health_path.to_string(),
            path_exclude: Regex::new(&format!(".*/{}$", regex::escape(health_path)))
                .expect("escaped suffix is a valid pattern"),
            hdr_exclude: Regex::new("(?i)^x-").expect("static pattern is valid"),
        }
    }

    /// Returns the configured health-check path suffix.
    #[must_use]
    pub fn health_path(&self) -> &str {
        &self.health_path
    }

    /// Returns whether a request path is excluded from audit logging.
    #[must_use]
    pub fn excludes_path(&self, path: &str) -> bool {
        self.path_exclude.is_match(path)
    }

    /// Returns whether a header name is redacted from audit logging.
    #[must_use]
    pub fn redacts_header(&self, name: &str) -> bool {
        self.hdr_exclude.is_match(name)
    }
}

/// Error a sink returns when it cannot accept a record.
#[derive(Debug, Clone)]
pub struct SinkError {
    /// Error message.
    pub message: String,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sink error: {}", self.message)
    }
}

impl std::error::Error for SinkError {}

/// Correlation fields of an inbound request audit record.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    /// Authenticated user name, if any.
    pub user: Option<String>,
    /// Request correlation ID.
    pub request_id: String,
    /// External correlation marker, if accepted.
    pub external_marker: Option<String>,
    /// End-user attribution, if any.
    pub end_user: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Request URI.
    pub uri: String,
    /// Query string, empty when absent.
    pub query: String,
}

/// Correlation fields of an outbound response audit record.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRecord {
    /// Authenticated user name, if any.
    pub user: Option<String>,
    /// Request correlation ID.
    pub request_id: String,
    /// External correlation marker, if accepted.
    pub external_marker: Option<String>,
    /// End-user attribution, if any.
    pub end_user: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Request URI.
    pub uri: String,
    /// Response status code.
    pub status: u16,
}

/// Destination for audit records.
///
/// The trait is the seam between the pipeline and the logging transport:
/// production uses [`TracingSink`], tests inject recording sinks, and a
/// deployment with an external audit store can bring its own. A sink
/// refusing a record is recovered locally; see the module docs.
pub trait AuditSink: Send + Sync + 'static {
    /// Accepts the inbound request record (info level).
    fn request(&self, record: &RequestRecord) -> Result<(), SinkError>;

    /// Accepts one non-redacted request header (debug level).
    fn header(&self, name: &str, value: &str) -> Result<(), SinkError>;

    /// Accepts the outbound response record (info level).
    fn response(&self, record: &ResponseRecord) -> Result<(), SinkError>;

    /// Accepts the full response body (debug level).
    fn response_body(&self, body: &[u8]) -> Result<(), SinkError>;
}

/// The default sink, emitting through `tracing`.
///
/// Absent correlation fields render as `-` so every record carries the same
/// shape regardless of authentication state.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn request(&self, record: &RequestRecord) -> Result<(), SinkError> {
        tracing::info!(
            user = record.user.as_deref().unwrap_or("-"),
            request_id = %record.request_id,
            external_marker = record.external_marker.as_deref().unwrap_or("-"),
            end_user = record.end_user.as_deref().unwrap_or("-"),
            method = %record.method,
            uri = %record.uri,
            query = %record.query,
            "inbound request"
        );
        Ok(())
    }

    fn header(&self, name: &str, value: &str) -> Result<(), SinkError> {
        tracing::debug!("Header {name}: {value}");
        Ok(())
    }

    fn response(&self, record: &ResponseRecord) -> Result<(), SinkError> {
        tracing::info!(
            user = record.user.as_deref().unwrap_or("-"),
            request_id = %record.request_id,
            external_marker = record.external_marker.as_deref().unwrap_or("-"),
            end_user = record.end_user.as_deref().unwrap_or("-"),
            method = %record.method,
            uri = %record.uri,
            status = record.status,
            "outbound response"
        );
        Ok(())
    }

    fn response_body(&self, body: &[u8]) -> Result<(), SinkError> {
        tracing::debug!(body = %String::from_utf8_lossy(body), "response body");
        Ok(())
    }
}

/// Middleware that audit-logs every request/response pair.
pub struct AuditMiddleware {
    /// Shared read-only configuration.
    config: Arc<AuditConfig>,

    /// Destination for audit records.
    sink: Arc<dyn AuditSink>,
}

impl AuditMiddleware {
    /// Creates an audit middleware emitting through [`TracingSink`].
    #[must_use]
    pub fn new(config: AuditConfig) -> Self {
        Self::with_sink(config, TracingSink)
    }

    /// Creates an audit middleware with a custom sink.
    #[must_use]
    pub fn with_sink<S: AuditSink>(config: AuditConfig, sink: S) -> Self {
        Self {
            config: Arc::new(config),
            sink: Arc::new(sink),
        }
    }

    /// Hands a record result to the failure accounting.
    ///
    /// Fire-and-forget: an entry may be lost, the request never is.
    fn emit(&self, result: Result<(), SinkError>) {
        if let Err(err) = result {
            metrics::counter!(AUDIT_SINK_FAILURES_METRIC).increment(1);
            tracing::warn!(error = %err, "audit sink refused a record");
        }
    }

    /// Logs the inbound request and its non-redacted headers.
    fn log_request(&self, ctx: &MiddlewareContext, request: &Request) {
        let record = RequestRecord {
            user: ctx.user().map(ToString::to_string),
            request_id: ctx.request_id().to_string(),
            external_marker: ctx.external_marker().map(ToString::to_string),
            end_user: ctx.end_user().map(ToString::to_string),
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            query: request.uri().query().unwrap_or("").to_string(),
        };
        self.emit(self.sink.request(&record));

        for (name, value) in request.headers() {
            if self.config.redacts_header(name.as_str()) {
                continue;
            }
            let value = String::from_utf8_lossy(value.as_bytes());
            self.emit(self.sink.header(name.as_str(), &value));
        }
    }
}

impl Middleware for AuditMiddleware {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let excluded = self.config.excludes_path(request.uri().path());

            // The request is consumed by the chain; keep what the response
            // record needs.
            let method = request.method().to_string();
            let uri = request.uri().to_string();

            if !excluded {
                self.log_request(ctx, &request);
            }

            let response = next.run(ctx, request).await;

            if excluded {
                return response;
            }

            let request_id = ctx.request_id().to_string();

            let (mut parts, body) = response.into_parts();
            parts.headers.append(
                ARMADA_REQUEST_HEADER,
                request_id
                    .parse()
                    .expect("request id is a valid header value"),
            );

            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };

            let record = ResponseRecord {
                user: ctx.user().map(ToString::to_string),
                request_id,
                external_marker: ctx.external_marker().map(ToString::to_string),
                end_user: ctx.end_user().map(ToString::to_string),
                method,
                uri,
                status: parts.status.as_u16(),
            };
            self.emit(self.sink.response(&record));
            self.emit(self.sink.response_body(&bytes));

            Response::from_parts(parts, Full::new(bytes))
        })
    }
}
