//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the collector.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the report collector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CollectorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route paths served by the collector.
    pub endpoint: EndpointConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits and client address handling.
    pub security: SecurityConfig,

    /// Where report records are written.
    pub sink: SinkConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// HTTP route paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Path browsers POST violation reports to.
    pub report_path: String,

    /// Liveness check path.
    pub health_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            report_path: "/report".to_string(),
            health_path: "/health".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline in seconds for receiving a report body. The outer
    /// request timeout allows a short grace period beyond it.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes. Larger bodies are an internal failure.
    pub max_body_size: usize,

    /// Take the source IP from the first `X-Forwarded-For` entry.
    /// Only enable behind a proxy that sets the header.
    pub trust_forwarded_for: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // 64KB
            trust_forwarded_for: false,
        }
    }
}

/// Sink destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Report record sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,

    /// File path, required when `kind = "file"`.
    pub path: Option<String>,
}

/// Diagnostic log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.endpoint.report_path, "/report");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.sink.kind, SinkKind::Stdout);
        assert!(!config.security.trust_forwarded_for);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CollectorConfig = toml::from_str(
            r#"
            [sink]
            kind = "file"
            path = "/var/log/csp.jsonl"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.sink.kind, SinkKind::File);
        assert_eq!(config.sink.path.as_deref(), Some("/var/log/csp.jsonl"));
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.endpoint.health_path, "/health");
    }

    #[test]
    fn test_unknown_sink_kind_rejected() {
        let result: Result<CollectorConfig, _> = toml::from_str("[sink]\nkind = \"kafka\"\n");
        assert!(result.is_err());
    }
}
