//! Main configuration types.
//!
//! This module provides the top-level [`ArmadaConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ApiConfig, LogFormat, LoggingConfig, MetricsConfig};

/// Complete Armada service configuration.
///
/// This is the root configuration type that contains all configuration
/// sections. Use [`ConfigLoader`](crate::ConfigLoader) to load configuration
/// from files and environment variables. The loaded value is read-only after
/// initialization and safely shared across concurrent request-handling tasks.
///
/// # Example
///
/// ```
/// use armada_config::ArmadaConfig;
///
/// let config = ArmadaConfig::default();
/// assert_eq!(config.api.health_path, "health");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ArmadaConfig {
    /// Pipeline configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ArmadaConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use armada_config::{ArmadaConfig, ApiConfig};
    ///
    /// let config = ArmadaConfig::builder()
    ///     .api(ApiConfig {
    ///         health_path: "healthz".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.api.health_path, "healthz");
    /// ```
    #[must_use]
    pub fn builder() -> ArmadaConfigBuilder {
        ArmadaConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - The health path is empty or contains a slash
    /// - The metrics address is invalid while metrics are enabled
    /// - The log level filter is empty
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.api.health_path.is_empty() {
            return Err(crate::ConfigError::invalid_value(
                "api.health_path",
                "must not be empty",
            ));
        }

        if self.api.health_path.contains('/') {
            return Err(crate::ConfigError::invalid_value(
                "api.health_path",
                "must be a path suffix without slashes",
            ));
        }

        if self.metrics.enabled
            && self.metrics.addr.parse::<std::net::SocketAddr>().is_err()
        {
            return Err(crate::ConfigError::invalid_value(
                "metrics.addr",
                format!("invalid socket address: {}", self.metrics.addr),
            ));
        }

        if self.logging.enabled && self.logging.level.is_empty() {
            return Err(crate::ConfigError::invalid_value(
                "logging.level",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty log formatting with ANSI colors, debug log level, source
    /// locations included.
    ///
    /// # Example
    ///
    /// ```
    /// use armada_config::ArmadaConfig;
    ///
    /// let config = ArmadaConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON log formatting, info log level.
    ///
    /// # Example
    ///
    /// ```
    /// use armada_config::{ArmadaConfig, LogFormat};
    ///
    /// let config = ArmadaConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config
    }

    /// Converts the logging section into the telemetry crate's
    /// [`LogConfig`](armada_telemetry::logging::LogConfig).
    #[must_use]
    pub fn log_config(&self) -> armada_telemetry::logging::LogConfig {
        armada_telemetry::logging::LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            json_format: self.logging.format == LogFormat::Json,
            ansi_enabled: self.logging.ansi_enabled,
            file_line_info: self.logging.include_location,
        }
    }

    /// Converts the metrics section into the telemetry crate's
    /// [`MetricsConfig`](armada_telemetry::metrics::MetricsConfig).
    #[must_use]
    pub fn metrics_config(&self) -> armada_telemetry::metrics::MetricsConfig {
        armada_telemetry::metrics::MetricsConfig {
            enabled: self.metrics.enabled,
            addr: self.metrics.addr.clone(),
        }
    }
}

/// Builder for [`ArmadaConfig`].
#[derive(Debug, Default)]
pub struct ArmadaConfigBuilder {
    api: Option<ApiConfig>,
    logging: Option<LoggingConfig>,
    metrics: Option<MetricsConfig>,
}

impl ArmadaConfigBuilder {
    /// Creates a new builder with all sections at their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pipeline section.
    #[must_use]
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Sets the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ArmadaConfig {
        ArmadaConfig {
            api: self.api.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        }
    }
}
