//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use serde::{Deserialize, Serialize};

/// API pipeline configuration section.
///
/// Controls the per-request middleware pipeline behavior.
///
/// # Example
///
/// ```
/// use armada_config::ApiConfig;
///
/// let config = ApiConfig {
///     health_path: "health".to_string(),
///     trust_request_id: false,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Health-check path suffix. Requests whose path ends with
    /// `/<health_path>` are excluded from audit logging.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Whether to adopt `X-Request-ID` headers from upstream services
    /// instead of always generating fresh request IDs.
    #[serde(default)]
    pub trust_request_id: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            health_path: default_health_path(),
            trust_request_id: false,
        }
    }
}

fn default_health_path() -> String {
    "health".to_string()
}

/// Metrics configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Enable metrics collection and export.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prometheus metrics endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON-formatted output for production log pipelines.
    Json,
    /// Human-readable output for development.
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable log output.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level filter (e.g. "info", "debug", "armada=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Whether to emit ANSI colors (pretty format only).
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Whether to include file/line info in log records.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_log_format(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.health_path, "health");
        assert!(!config.trust_request_id);
    }

    #[test]
    fn test_metrics_defaults() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
    }

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_serde_names() {
        let json: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(json, LogFormat::Json);
        let pretty: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(pretty, LogFormat::Pretty);
    }
}
