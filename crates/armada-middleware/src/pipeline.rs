//! Fixed-order middleware pipeline.
//!
//! This module implements the pipeline that every request flows through.
//! The stage order is fixed:
//!
//! 1. **Request ID** - Assign the request identifier
//! 2. **Auth** - Resolve the trust headers into an identity
//! 3. **Enrich** - Accept the correlation marker and end-user attribution
//! 4. **Audit** - Log the request and response, wrapping the handler
//!
//! The order is load-bearing: the enrichment stage falls back to the user
//! the auth stage resolved, and the audit stage logs fields both earlier
//! stages populated. The builder accepts stages in any order for testing,
//! but [`Pipeline::standard`] constructs the canonical chain.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::stages::{AuditMiddleware, AuthMiddleware, EnrichMiddleware, RequestIdMiddleware};
use crate::types::{Request, Response};
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// The fixed-order middleware pipeline.
///
/// # Example
///
/// ```ignore
/// use armada_middleware::pipeline::Pipeline;
/// use armada_middleware::stages::AuditConfig;
///
/// let pipeline = Pipeline::standard(AuditConfig::new("health"));
/// let response = pipeline.process(ctx, request, handler).await;
/// ```
pub struct Pipeline {
    /// The ordered middleware chain.
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Builds the canonical four-stage pipeline.
    ///
    /// The audit configuration is built once at process start and shared
    /// read-only by every in-flight request.
    #[must_use]
    pub fn standard(audit_config: crate::stages::AuditConfig) -> Self {
        Self::builder()
            .add_stage(RequestIdMiddleware::new())
            .add_stage(AuthMiddleware::new())
            .add_stage(EnrichMiddleware::new())
            .add_stage(AuditMiddleware::new(audit_config))
            .build()
    }

    /// Processes a request through the entire pipeline.
    ///
    /// This is the main entry point for request processing. The request
    /// flows through all stages in order, then to the handler, then back
    /// out through the stages that post-process the response.
    pub async fn process<H>(
        &self,
        mut ctx: MiddlewareContext,
        request: Request,
        handler: H,
    ) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        let next = self.build_chain(handler);
        next.run(&mut ctx, request).await
    }

    /// Builds the middleware chain for a request.
    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        // Start with the handler as the terminal point, then wrap with the
        // stages in reverse so the first stage runs outermost.
        let mut next = Next::handler(handler);

        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }

        next
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for constructing a [`Pipeline`].
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates a new, empty pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a middleware stage to the chain.
    #[must_use]
    pub fn add_stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware stage marker for the fixed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: Request ID assignment
    RequestId = 1,
    /// Stage 2: Trust-header identity resolution
    Auth = 2,
    /// Stage 3: Correlation marker and end-user enrichment
    Enrich = 3,
    /// Stage 4: Audit logging (wraps the handler)
    Audit = 4,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::Auth => "auth",
            Self::Enrich => "enrich",
            Self::Audit => "audit",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 4] {
        [Self::RequestId, Self::Auth, Self::Enrich, Self::Audit]
    }
}
