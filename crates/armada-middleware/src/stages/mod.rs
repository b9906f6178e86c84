//! Core middleware stages.
//!
//! This module contains the implementations of the four pipeline stages.
//! They execute in a fixed order within one request:
//!
//! 1. [`request_id`] - Assign the request identifier
//! 2. [`auth`] - Resolve the proxy trust headers into an identity
//! 3. [`enrich`] - Accept the correlation marker and end-user attribution
//! 4. [`audit`] - Log the request/response pair, wrapping the handler

pub mod audit;
pub mod auth;
pub mod enrich;
pub mod request_id;

// Re-export main types
pub use audit::{
    AuditConfig, AuditMiddleware, AuditSink, RequestRecord, ResponseRecord, SinkError, TracingSink,
};
pub use auth::AuthMiddleware;
pub use enrich::EnrichMiddleware;
pub use request_id::RequestIdMiddleware;
