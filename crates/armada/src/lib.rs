//! # Armada
//!
//! **Request-processing pipeline for a service behind an identity-aware
//! reverse proxy**
//!
//! The proxy validates every caller and annotates requests with trust
//! headers; Armada's pipeline is the single place those headers are
//! interpreted:
//!
//! - 🔒 **Trust resolution** – Convert proxy-verified headers into an
//!   immutable per-request context, never mixing header families
//! - 🧭 **Correlation** – Thread an external marker and end-user
//!   attribution through the context
//! - 📜 **Audit logging** – Structured request/response records with
//!   hard redaction of `X-*` trust headers
//! - 📊 **Observability** – Structured logs and Prometheus counters
//!
//! ## Architecture
//!
//! The middleware pipeline runs in a fixed order within each request:
//!
//! ```text
//! Request → RequestId → Auth → Enrich → Audit → Handler
//!                                         ↓
//! Response ←──────────────────────────── Audit
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use armada::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("armada.toml")?
//!         .with_env_prefix("ARMADA")
//!         .load()?;
//!
//!     init_logging(&config.log_config())?;
//!     init_metrics(&config.metrics_config())?;
//!
//!     let pipeline = Pipeline::standard(AuditConfig::new(&config.api.health_path));
//!     // Hand the pipeline to the server loop...
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/armada/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use armada_core as core;

// Re-export middleware types
pub use armada_middleware as middleware;

// Re-export configuration types
pub use armada_config as config;

// Re-export telemetry types
pub use armada_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use armada::prelude::*;
/// ```
pub mod prelude {
    pub use armada_core::{
        ArmadaError, ArmadaResult, RequestContext, RequestId, TrustedIdentity,
    };

    pub use armada_middleware::{
        stages::{AuditConfig, AuditMiddleware, AuditSink, AuthMiddleware, EnrichMiddleware,
                 RequestIdMiddleware, TracingSink},
        MiddlewareContext, Middleware, Next, Pipeline, Stage,
    };

    pub use armada_config::{ArmadaConfig, ConfigLoader};

    pub use armada_telemetry::{init_logging, init_metrics};
}
