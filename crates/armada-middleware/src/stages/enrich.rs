//! Correlation and attribution enrichment middleware.
//!
//! Runs after the auth stage. Two enrichments happen here:
//!
//! - `X-Context-Marker`: a caller-supplied token linking this request to an
//!   originating external transaction. Accepted only in canonical UUID form;
//!   anything else leaves the marker unset and the request proceeds.
//! - `X-End-User`: the human or service ultimately attributed responsibility
//!   for the request. Falls back to the authenticated user when absent,
//!   which is why this stage must run after auth.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use uuid::Uuid;

/// Header carrying the external correlation marker.
pub const CONTEXT_MARKER_HEADER: &str = "x-context-marker";

/// Header carrying the end-user attribution.
pub const END_USER_HEADER: &str = "x-end-user";

/// Middleware that enriches the context with correlation metadata.
#[derive(Debug, Clone)]
pub struct EnrichMiddleware {
    /// The UUID version a correlation marker must carry.
    marker_version: usize,
}

impl Default for EnrichMiddleware {
    fn default() -> Self {
        Self { marker_version: 4 }
    }
}

impl EnrichMiddleware {
    /// Creates an enrichment middleware accepting version-4 markers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enrichment middleware accepting markers of the given
    /// UUID version.
    #[must_use]
    pub const fn with_marker_version(marker_version: usize) -> Self {
        Self { marker_version }
    }
}

/// Returns whether `value` is a canonical UUID string of the given version.
///
/// Canonical means the lowercase hyphenated form: the parsed UUID must
/// format back to exactly the input. Uppercase hex, missing hyphens, braced
/// and URN forms all parse, but fail the round-trip and are rejected.
/// Regex matching alone would accept look-alikes that other systems then
/// normalize differently.
pub fn is_canonical_uuid(value: &str, version: usize) -> bool {
    match Uuid::parse_str(value) {
        Ok(uuid) => uuid.get_version_num() == version && uuid.to_string() == value,
        Err(_) => false,
    }
}

impl Middleware for EnrichMiddleware {
    fn name(&self) -> &'static str {
        "enrich"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let marker = request
                .headers()
                .get(CONTEXT_MARKER_HEADER)
                .and_then(|v| v.to_str().ok());

            if let Some(marker) = marker {
                if is_canonical_uuid(marker, self.marker_version) {
                    ctx.set_external_marker(marker);
                } else {
                    // Recovered locally: the marker stays unset and the
                    // request proceeds normally.
                    tracing::debug!(marker, "ignoring non-canonical context marker");
                }
            }

            let end_user = request
                .headers()
                .get(END_USER_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
                .or_else(|| ctx.user().map(ToString::to_string));
            ctx.set_end_user(end_user);

            next.run(ctx, request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armada_core::TrustedIdentity;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;
    use proptest::prelude::*;

    const VALID_MARKER: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn create_handler(
    ) -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> {
        |_ctx, _req| {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("OK")))
                    .unwrap()
            })
        }
    }

    async fn run(request: Request, mut ctx: MiddlewareContext) -> MiddlewareContext {
        let middleware = EnrichMiddleware::new();
        let next = Next::handler(create_handler());
        let _response = middleware.process(&mut ctx, request, next).await;
        ctx
    }

    fn authenticated_ctx(user: &str) -> MiddlewareContext {
        let mut ctx = MiddlewareContext::new();
        ctx.confirm_identity(TrustedIdentity {
            user: Some(user.to_string()),
            ..TrustedIdentity::default()
        });
        ctx
    }

    #[tokio::test]
    async fn test_valid_marker_is_accepted() {
        let request = HttpRequest::builder()
            .uri("/charts")
            .header(CONTEXT_MARKER_HEADER, VALID_MARKER)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, MiddlewareContext::new()).await;
        assert_eq!(ctx.external_marker(), Some(VALID_MARKER));
    }

    #[tokio::test]
    async fn test_non_canonical_markers_are_rejected() {
        for marker in [
            "550E8400-E29B-41D4-A716-446655440000", // uppercase
            "550e8400e29b41d4a716446655440000",     // no hyphens
            "{550e8400-e29b-41d4-a716-446655440000}", // braced
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000",
            "not-a-uuid",
            "",
        ] {
            let request = HttpRequest::builder()
                .uri("/charts")
                .header(CONTEXT_MARKER_HEADER, marker)
                .body(Full::new(Bytes::new()))
                .unwrap();
            let ctx = run(request, MiddlewareContext::new()).await;
            assert!(
                ctx.external_marker().is_none(),
                "marker should be rejected: {marker:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_wrong_version_marker_is_rejected() {
        // Canonical form, but version 7
        let marker = Uuid::now_v7().to_string();
        let request = HttpRequest::builder()
            .uri("/charts")
            .header(CONTEXT_MARKER_HEADER, marker.as_str())
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, MiddlewareContext::new()).await;
        assert!(ctx.external_marker().is_none());
    }

    #[tokio::test]
    async fn test_absent_marker_leaves_field_unset() {
        let request = HttpRequest::builder()
            .uri("/charts")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, MiddlewareContext::new()).await;
        assert!(ctx.external_marker().is_none());
    }

    #[tokio::test]
    async fn test_end_user_header_wins() {
        let request = HttpRequest::builder()
            .uri("/charts")
            .header(END_USER_HEADER, "bob")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, authenticated_ctx("alice")).await;
        assert_eq!(ctx.end_user(), Some("bob"));
    }

    #[tokio::test]
    async fn test_end_user_falls_back_to_user() {
        let request = HttpRequest::builder()
            .uri("/charts")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, authenticated_ctx("alice")).await;
        assert_eq!(ctx.end_user(), Some("alice"));
    }

    #[tokio::test]
    async fn test_empty_end_user_header_falls_back_to_user() {
        let request = HttpRequest::builder()
            .uri("/charts")
            .header(END_USER_HEADER, "")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, authenticated_ctx("alice")).await;
        assert_eq!(ctx.end_user(), Some("alice"));
    }

    #[tokio::test]
    async fn test_end_user_stays_absent_for_unauthenticated_requests() {
        // No sentinel is substituted; absence propagates.
        let request = HttpRequest::builder()
            .uri("/charts")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let ctx = run(request, MiddlewareContext::new()).await;
        assert!(ctx.end_user().is_none());
    }

    #[test]
    fn test_is_canonical_uuid_accepts_v4() {
        assert!(is_canonical_uuid(VALID_MARKER, 4));
    }

    #[test]
    fn test_is_canonical_uuid_version_parameter() {
        let v7 = Uuid::now_v7().to_string();
        assert!(!is_canonical_uuid(&v7, 4));
        assert!(is_canonical_uuid(&v7, 7));
    }

    proptest! {
        /// Generated v4 UUIDs in canonical form always round-trip and are
        /// accepted; the same bytes rendered uppercase never are.
        #[test]
        fn prop_canonical_v4_accepted_uppercase_rejected(bytes in any::<[u8; 16]>()) {
            let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
            let canonical = uuid.to_string();
            prop_assert!(is_canonical_uuid(&canonical, 4));

            let upper = canonical.to_uppercase();
            if upper != canonical {
                prop_assert!(!is_canonical_uuid(&upper, 4));
            }
        }

        /// Arbitrary strings that are not canonical v4 UUIDs are rejected
        /// rather than panicking.
        #[test]
        fn prop_arbitrary_strings_never_panic(s in ".{0,64}") {
            let accepted = is_canonical_uuid(&s, 4);
            if accepted {
                let parsed = Uuid::parse_str(&s).unwrap();
                prop_assert_eq!(parsed.to_string(), s);
            }
        }
    }
}
