//! Request context types.
//!
//! The [`RequestContext`] is the immutable per-request snapshot produced by
//! the middleware pipeline once the trust stages have run. Handlers and the
//! audit stage read it; nothing mutates it after construction.

use crate::identity::TrustedIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use armada_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    ///
    /// Useful when adopting a request ID supplied by an upstream service.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Immutable per-request context snapshot.
///
/// `RequestContext` carries the resolved trust and correlation state for one
/// request:
///
/// - Unique request ID assigned before the trust stages ran
/// - Whether the reverse proxy confirmed the caller's identity
/// - The identity attributes sourced from the trust headers
/// - The external correlation marker and end-user attribution
///
/// # Invariants
///
/// `authenticated() == true` implies the identity fields were populated from
/// a single consistent trust-header family. `authenticated() == false` means
/// no identity field is trustworthy and downstream authorization must not
/// read them.
///
/// # Example
///
/// ```
/// use armada_core::RequestContext;
///
/// let ctx = RequestContext::new();
/// assert!(!ctx.authenticated());
/// assert!(ctx.user().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Whether the trust headers carried a confirmed identity.
    authenticated: bool,

    /// User name from the trust headers.
    user: Option<String>,

    /// User ID from the trust headers.
    user_id: Option<String>,

    /// User domain ID from the trust headers.
    user_domain_id: Option<String>,

    /// Project ID from the trust headers.
    project_id: Option<String>,

    /// Project domain ID from the trust headers.
    project_domain_id: Option<String>,

    /// Role names, duplicates collapsed.
    roles: BTreeSet<String>,

    /// Whether the proxy marked the scoping project as the admin project.
    is_admin_project: bool,

    /// Caller-supplied correlation marker, canonical UUID form only.
    external_marker: Option<String>,

    /// The attributed human or service responsible for the request.
    end_user: Option<String>,
}

impl RequestContext {
    /// Creates an unauthenticated context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates an unauthenticated context with the specified request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            authenticated: false,
            user: None,
            user_id: None,
            user_domain_id: None,
            project_id: None,
            project_domain_id: None,
            roles: BTreeSet::new(),
            is_admin_project: false,
            external_marker: None,
            end_user: None,
        }
    }

    /// Returns a new context carrying a confirmed identity.
    #[must_use]
    pub fn with_identity(mut self, identity: TrustedIdentity) -> Self {
        self.authenticated = true;
        self.user = identity.user;
        self.user_id = identity.user_id;
        self.user_domain_id = identity.user_domain_id;
        self.project_id = identity.project_id;
        self.project_domain_id = identity.project_domain_id;
        self.roles = identity.roles;
        self
    }

    /// Returns a new context with the admin-project flag set.
    #[must_use]
    pub fn with_admin_project(mut self, is_admin_project: bool) -> Self {
        self.is_admin_project = is_admin_project;
        self
    }

    /// Returns a new context with the external correlation marker set.
    #[must_use]
    pub fn with_external_marker(mut self, marker: impl Into<String>) -> Self {
        self.external_marker = Some(marker.into());
        self
    }

    /// Returns a new context with the end-user attribution set.
    #[must_use]
    pub fn with_end_user(mut self, end_user: Option<String>) -> Self {
        self.end_user = end_user;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns whether the trust headers carried a confirmed identity.
    #[must_use]
    pub const fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the user name if a confirmed identity carried one.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the user ID if a confirmed identity carried one.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the user domain ID if a confirmed identity carried one.
    #[must_use]
    pub fn user_domain_id(&self) -> Option<&str> {
        self.user_domain_id.as_deref()
    }

    /// Returns the project ID if a confirmed identity carried one.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Returns the project domain ID if a confirmed identity carried one.
    #[must_use]
    pub fn project_domain_id(&self) -> Option<&str> {
        self.project_domain_id.as_deref()
    }

    /// Returns the role set.
    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Returns whether the scoping project is the admin project.
    #[must_use]
    pub const fn is_admin_project(&self) -> bool {
        self.is_admin_project
    }

    /// Returns the external correlation marker, if one was accepted.
    #[must_use]
    pub fn external_marker(&self) -> Option<&str> {
        self.external_marker.as_deref()
    }

    /// Returns the end-user attribution, if any.
    #[must_use]
    pub fn end_user(&self) -> Option<&str> {
        self.end_user.as_deref()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new_generates_unique_ids() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Each RequestId should be unique");
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        let display = id.to_string();
        // UUID v7 format: xxxxxxxx-xxxx-7xxx-xxxx-xxxxxxxxxxxx
        assert_eq!(display.len(), 36, "UUID string should be 36 characters");
        assert!(display.contains('-'), "UUID should contain hyphens");
    }

    #[test]
    fn test_request_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_request_id_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).expect("serialization should work");
        let parsed: RequestId = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_new_context_is_unauthenticated() {
        let ctx = RequestContext::new();
        assert!(!ctx.authenticated());
        assert!(ctx.user().is_none());
        assert!(ctx.user_id().is_none());
        assert!(ctx.project_id().is_none());
        assert!(ctx.roles().is_empty());
        assert!(!ctx.is_admin_project());
        assert!(ctx.external_marker().is_none());
        assert!(ctx.end_user().is_none());
    }

    #[test]
    fn test_with_identity_populates_all_fields() {
        let identity = TrustedIdentity {
            user: Some("alice".to_string()),
            user_id: Some("u1".to_string()),
            user_domain_id: Some("d1".to_string()),
            project_id: Some("p1".to_string()),
            project_domain_id: Some("pd1".to_string()),
            roles: ["admin", "viewer"].iter().map(ToString::to_string).collect(),
        };

        let ctx = RequestContext::new().with_identity(identity);
        assert!(ctx.authenticated());
        assert_eq!(ctx.user(), Some("alice"));
        assert_eq!(ctx.user_id(), Some("u1"));
        assert_eq!(ctx.user_domain_id(), Some("d1"));
        assert_eq!(ctx.project_id(), Some("p1"));
        assert_eq!(ctx.project_domain_id(), Some("pd1"));
        assert_eq!(ctx.roles().len(), 2);
        assert!(ctx.roles().contains("admin"));
    }

    #[test]
    fn test_builder_pattern() {
        let ctx = RequestContext::new()
            .with_admin_project(true)
            .with_external_marker("550e8400-e29b-41d4-a716-446655440000")
            .with_end_user(Some("alice".to_string()));

        assert!(ctx.is_admin_project());
        assert_eq!(
            ctx.external_marker(),
            Some("550e8400-e29b-41d4-a716-446655440000")
        );
        assert_eq!(ctx.end_user(), Some("alice"));
    }

    #[test]
    fn test_end_user_may_stay_absent() {
        let ctx = RequestContext::new().with_end_user(None);
        assert!(ctx.end_user().is_none());
    }
}
