//! Request ID middleware.
//!
//! This stage assigns the unique request identifier the rest of the
//! pipeline correlates on. It runs before the trust stages so that every
//! audit record carries an ID, including the 500 the auth stage emits for
//! malformed trust data.
//!
//! ## Request ID Sources
//!
//! 1. **X-Request-ID header**: used when the stage is configured to trust
//!    upstream-assigned IDs
//! 2. **Generated UUID v7**: otherwise
//!
//! The audit stage, not this one, echoes the ID back to the caller on the
//! `X-Armada-Req` response header.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use armada_core::RequestId;
use uuid::Uuid;

/// The header name for request ID propagation from upstream services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that generates or adopts request IDs.
///
/// # Behavior
///
/// 1. Check for `X-Request-ID` header (only when trusting upstream)
/// 2. If present and a valid UUID, adopt it
/// 3. Otherwise generate a new UUID v7
/// 4. Store the ID in the [`MiddlewareContext`]
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware {
    /// Whether to trust incoming request ID headers.
    ///
    /// Behind the identity-aware proxy this is typically `false`: the proxy
    /// terminates external traffic and the service assigns its own IDs.
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Creates a new request ID middleware that always generates fresh IDs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a middleware that adopts valid incoming `X-Request-ID` headers.
    #[must_use]
    pub fn trust_incoming() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    /// Extracts a request ID from headers if present and valid.
    fn extract_request_id(&self, request: &Request) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }

        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(RequestId::from_uuid)
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = self
                .extract_request_id(&request)
                .unwrap_or_else(RequestId::new);

            ctx.set_request_id(request_id);

            next.run(ctx, request).await
        })
    }
}
