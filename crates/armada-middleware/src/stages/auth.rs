//! Trust-header identity resolution middleware.
//!
//! The identity-aware reverse proxy in front of the service validates the
//! caller and annotates every request with trust headers. This stage
//! resolves those headers into the context's identity fields; it performs
//! no token or signature verification of its own.
//!
//! Two header families exist:
//!
//! - **Service** (`X-SERVICE-*`): a second actor, e.g. an internal service
//!   acting on behalf of the caller
//! - **Plain** (`X-*`): the caller itself
//!
//! The presence of `X-SERVICE-IDENTITY-STATUS` selects the service family
//! for the whole request; attributes are never mixed across families.
//!
//! Absent or unconfirmed status headers are a normal state meaning
//! "unauthenticated", not an error. The one hard failure is a confirmed
//! identity without a roles header: downstream authorization cannot tell
//! "no roles" from "misconfigured proxy", so the stage refuses the request
//! with a 500 envelope instead of defaulting to an empty role set.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use armada_core::{ArmadaError, ArmadaResult, TrustedIdentity};
use std::collections::BTreeSet;

/// Identity status header written by the proxy for service-to-service calls.
pub const SERVICE_IDENTITY_STATUS_HEADER: &str = "x-service-identity-status";

/// Identity status header written by the proxy for direct user calls.
pub const IDENTITY_STATUS_HEADER: &str = "x-identity-status";

/// Admin-project flag header.
pub const IS_ADMIN_PROJECT_HEADER: &str = "x-is-admin-project";

/// The status value the proxy writes once it has verified the identity.
const CONFIRMED: &str = "Confirmed";

/// Per-family trust header names.
struct HeaderFamily {
    user: &'static str,
    user_id: &'static str,
    user_domain_id: &'static str,
    project_id: &'static str,
    project_domain_id: &'static str,
    roles: &'static str,
}

/// Headers describing the service actor.
const SERVICE_FAMILY: HeaderFamily = HeaderFamily {
    user: "x-service-user-name",
    user_id: "x-service-user-id",
    user_domain_id: "x-service-user-domain-id",
    project_id: "x-service-project-id",
    project_domain_id: "x-service-project-domain-id",
    roles: "x-service-roles",
};

/// Headers describing the direct caller.
///
/// `project_domain_id` is sourced from `X-PROJECT-DOMAIN-NAME`, not
/// `X-PROJECT-DOMAIN-ID`. The asymmetry with the service family is the
/// header contract the proxy emits today; do not "fix" it here without
/// confirmation from the proxy's owners.
const PLAIN_FAMILY: HeaderFamily = HeaderFamily {
    user: "x-user-name",
    user_id: "x-user-id",
    user_domain_id: "x-user-domain-id",
    project_id: "x-project-id",
    project_domain_id: "x-project-domain-name",
    roles: "x-roles",
};

/// Middleware that resolves proxy trust headers into the request identity.
///
/// # Behavior
///
/// 1. `X-SERVICE-IDENTITY-STATUS` present → service call; otherwise read
///    `X-IDENTITY-STATUS` for a direct call
/// 2. Status `"Confirmed"` → populate the context from the matching header
///    family and split the roles header into the role set
/// 3. Anything else → leave the context unauthenticated
///
/// Header values that are not valid UTF-8 are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Creates a new auth middleware.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reads a header value as a string, treating non-UTF-8 values as absent.
    fn header<'r>(request: &'r Request, name: &str) -> Option<&'r str> {
        request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Extracts the full identity bundle from one header family.
    ///
    /// Fails only when the roles header is absent: a confirmed identity
    /// without roles is malformed trust data, not an empty permission set.
    fn resolve_identity(request: &Request, family: &HeaderFamily) -> ArmadaResult<TrustedIdentity> {
        let roles = split_roles(Self::header(request, family.roles), family.roles)?;

        Ok(TrustedIdentity {
            user: Self::header(request, family.user).map(ToString::to_string),
            user_id: Self::header(request, family.user_id).map(ToString::to_string),
            user_domain_id: Self::header(request, family.user_domain_id).map(ToString::to_string),
            project_id: Self::header(request, family.project_id).map(ToString::to_string),
            project_domain_id: Self::header(request, family.project_domain_id)
                .map(ToString::to_string),
            roles,
        })
    }
}

/// Splits a roles header value on commas into a role set.
///
/// Returns [`ArmadaError::MalformedTrustData`] when the header is absent,
/// forcing the caller to decide fail-fast vs default-empty explicitly. The
/// value is split as received: roles are not trimmed and an empty header
/// yields the single empty-string role, matching the proxy contract as
/// observed.
pub fn split_roles(value: Option<&str>, header_name: &str) -> ArmadaResult<BTreeSet<String>> {
    let value = value.ok_or_else(|| {
        ArmadaError::malformed_trust_data(format!(
            "confirmed identity without a {header_name} header"
        ))
    })?;

    Ok(value.split(',').map(ToString::to_string).collect())
}

impl Middleware for AuthMiddleware {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let (status, family) =
                match Self::header(&request, SERVICE_IDENTITY_STATUS_HEADER) {
                    Some(status) => (Some(status), &SERVICE_FAMILY),
                    None => (
                        Self::header(&request, IDENTITY_STATUS_HEADER),
                        &PLAIN_FAMILY,
                    ),
                };

            if status == Some(CONFIRMED) {
                let identity = match Self::resolve_identity(&request, family) {
                    Ok(identity) => identity,
                    Err(err) => {
                        let request_id = ctx.request_id().to_string();
                        tracing::error!(
                            request_id = %request_id,
                            error = %err,
                            "refusing request with malformed trust data"
                        );
                        return Response::from_error(&err, Some(&request_id));
                    }
                };

                let is_admin_project =
                    Self::header(&request, IS_ADMIN_PROJECT_HEADER) == Some("True");

                tracing::debug!(
                    user = identity.log_id(),
                    roles = %identity.joined_roles(),
                    "request from authenticated user"
                );

                ctx.confirm_identity(identity);
                ctx.set_admin_project(is_admin_project);
            }
            // Unconfirmed or absent status: the context stays at its
            // unauthenticated defaults and no identity field is trusted.

            next.run(ctx, request).await
        })
    }
}
