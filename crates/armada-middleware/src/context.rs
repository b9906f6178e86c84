//! Middleware context types.
//!
//! The [`MiddlewareContext`] carries per-request state through the pipeline.
//! It is mutable while the trust stages run and is converted to an immutable
//! [`RequestContext`](armada_core::RequestContext) snapshot for handlers.

use armada_core::{RequestContext, RequestId, TrustedIdentity};
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// Context that flows through the middleware pipeline.
///
/// One instance exists per inbound request, created before the pipeline runs
/// and exclusively owned by that request's task. The auth stage mutates it
/// once (identity), the enrichment stage mutates it once (correlation
/// marker, end user), and the audit stage only reads it. It is discarded
/// when the response has been sent, never cached, shared, or reused.
///
/// # Example
///
/// ```
/// use armada_middleware::context::MiddlewareContext;
/// use armada_core::TrustedIdentity;
///
/// let mut ctx = MiddlewareContext::new();
/// assert!(!ctx.authenticated());
///
/// ctx.confirm_identity(TrustedIdentity {
///     user: Some("alice".to_string()),
///     ..TrustedIdentity::default()
/// });
/// assert!(ctx.authenticated());
/// assert_eq!(ctx.user(), Some("alice"));
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
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

    /// When the request started processing.
    started_at: Instant,

    /// Type-erased extension data.
    ///
    /// Middleware can store arbitrary data here using type-safe keys.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a new middleware context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    ///
    /// Useful when the request ID was assigned by an upstream service.
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
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sets the request ID.
    ///
    /// This should only be called by the request-id stage.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns whether the trust headers carried a confirmed identity.
    #[must_use]
    pub const fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Marks the context authenticated and applies a whole identity bundle.
    ///
    /// Applying a [`TrustedIdentity`] atomically keeps the invariant that a
    /// confirmed context never mixes attributes from the service and plain
    /// header families. This should only be called by the auth stage.
    pub fn confirm_identity(&mut self, identity: TrustedIdentity) {
        self.authenticated = true;
        self.user = identity.user;
        self.user_id = identity.user_id;
        self.user_domain_id = identity.user_domain_id;
        self.project_id = identity.project_id;
        self.project_domain_id = identity.project_domain_id;
        self.roles = identity.roles;
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

    /// Sets the admin-project flag.
    ///
    /// This should only be called by the auth stage.
    pub fn set_admin_project(&mut self, is_admin_project: bool) {
        self.is_admin_project = is_admin_project;
    }

    /// Returns the external correlation marker, if one was accepted.
    #[must_use]
    pub fn external_marker(&self) -> Option<&str> {
        self.external_marker.as_deref()
    }

    /// Sets the external correlation marker.
    ///
    /// This should only be called by the enrichment stage, after the marker
    /// passed canonical-UUID validation.
    pub fn set_external_marker(&mut self, marker: impl Into<String>) {
        self.external_marker = Some(marker.into());
    }

    /// Returns the end-user attribution, if any.
    #[must_use]
    pub fn end_user(&self) -> Option<&str> {
        self.end_user.as_deref()
    }

    /// Sets the end-user attribution.
    ///
    /// `None` is a valid value: an unauthenticated request without an
    /// `X-End-User` header has no attribution and no sentinel is invented.
    pub fn set_end_user(&mut self, end_user: Option<String>) {
        self.end_user = end_user;
    }

    /// Returns when the request started processing.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    ///
    /// Extensions allow middleware to store arbitrary data that can be
    /// retrieved by later middleware or handlers.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    ///
    /// Returns `None` if no extension of the given type was stored.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }

    /// Converts this middleware context to a [`RequestContext`].
    ///
    /// This is called after the trust stages have run, before invoking the
    /// handler.
    #[must_use]
    pub fn to_request_context(&self) -> RequestContext {
        let mut ctx = RequestContext::with_request_id(self.request_id);

        if self.authenticated {
            ctx = ctx.with_identity(TrustedIdentity {
                user: self.user.clone(),
                user_id: self.user_id.clone(),
                user_domain_id: self.user_domain_id.clone(),
                project_id: self.project_id.clone(),
                project_domain_id: self.project_domain_id.clone(),
                roles: self.roles.clone(),
            });
        }

        ctx = ctx.with_admin_project(self.is_admin_project);

        if let Some(marker) = &self.external_marker {
            ctx = ctx.with_external_marker(marker.clone());
        }

        ctx.with_end_user(self.end_user.clone())
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}
