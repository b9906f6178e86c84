//! # Armada Middleware
//!
//! Trust-header middleware pipeline for the Armada service.
//!
//! Armada sits behind an identity-aware reverse proxy. The proxy validates
//! the caller and annotates every inbound request with trust headers; this
//! crate is the only place those headers are interpreted. Getting this
//! layer wrong means the service logs secrets, misattributes actions, or
//! treats unauthenticated callers as authenticated. The pipeline order is
//! therefore fixed and the redaction rules are not configuration.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Request → RequestId → Auth → Enrich → Audit → Handler
//!                                         ↓
//! Response ←──────────────────────────── Audit
//! ```
//!
//! | Stage | Middleware            | Purpose                                      |
//! |-------|----------------------|----------------------------------------------|
//! | 1     | Request ID            | Assign the request correlation ID (UUID v7)  |
//! | 2     | Auth                  | Resolve proxy trust headers into an identity |
//! | 3     | Enrich                | External marker and end-user attribution     |
//! | 4     | Audit                 | Structured request/response audit logging    |
//!
//! The audit stage wraps the handler, logging on both sides and echoing the
//! request ID back on the `X-Armada-Req` response header.
//!
//! ## Example
//!
//! ```
//! use armada_middleware::pipeline::{Pipeline, Stage};
//! use armada_middleware::stages::AuditConfig;
//!
//! let pipeline = Pipeline::standard(AuditConfig::new("health"));
//! assert_eq!(pipeline.stage_names(), vec!["request_id", "auth", "enrich", "audit"]);
//! assert_eq!(Stage::all().len(), 4);
//! ```

#![doc(html_root_url = "https://docs.rs/armada-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

// Re-export main types at crate root
pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
pub use types::{Request, Response, ResponseExt};
