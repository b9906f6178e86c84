//! # Armada Core
//!
//! Core types for the Armada request-processing pipeline.
//!
//! This crate provides the foundational types used throughout Armada:
//!
//! - [`RequestContext`] - Immutable per-request snapshot of trust and correlation state
//! - [`RequestId`] - UUID v7 request identifier
//! - [`TrustedIdentity`] - Identity bundle extracted from one trust-header family
//! - [`ArmadaError`] - Standard error types

#![doc(html_root_url = "https://docs.rs/armada-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod identity;

pub use context::{RequestContext, RequestId};
pub use error::{ArmadaError, ArmadaResult, ErrorDetail, ErrorEnvelope};
pub use identity::TrustedIdentity;
