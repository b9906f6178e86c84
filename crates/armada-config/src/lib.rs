//! Typed configuration system for Armada.
//!
//! This crate provides a strongly-typed configuration system for the Armada
//! service with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! Configuration is loaded once at process start; the resulting
//! [`ArmadaConfig`] is read-only and safely shared across concurrent
//! request-handling tasks.
//!
//! # Example
//!
//! ```no_run
//! use armada_config::ConfigLoader;
//!
//! # fn main() -> Result<(), armada_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("armada.toml")?
//!     .with_env_prefix("ARMADA")
//!     .load()?;
//!
//! println!("health path suffix: {}", config.api.health_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! health_path = "health"
//! trust_request_id = false
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```
//!
//! # Environment Variable Overrides
//!
//! All configuration values can be overridden via environment variables
//! using the format `PREFIX__SECTION__KEY`. For example:
//!
//! - `ARMADA__API__HEALTH_PATH=healthz`
//! - `ARMADA__LOGGING__LEVEL=debug`
//! - `ARMADA__METRICS__ENABLED=false`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{ArmadaConfig, ArmadaConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ApiConfig, LogFormat, LoggingConfig, MetricsConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArmadaConfig::default();
        assert_eq!(config.api.health_path, "health");
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_config_builder() {
        let config = ArmadaConfig::builder()
            .api(ApiConfig {
                health_path: "healthz".to_string(),
                ..Default::default()
            })
            .build();

        assert_eq!(config.api.health_path, "healthz");
    }
}
