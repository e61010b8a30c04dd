//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Services to probe, in probing order.
    pub services: Vec<ServiceConfig>,

    /// Check cadence and probe limits.
    pub monitor: ProbeSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single probed service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique service name, used as the `app` metric label.
    pub name: String,

    /// Base URL; `/health` and `/work` are appended to it.
    pub url: String,
}

/// What the liveness check records when a `/health` body cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFailurePolicy {
    /// Touch no gauge; `service_up` and `up_since` keep their last values.
    #[default]
    Preserve,
    /// Raise the `health_decode_failure` flag, reset like the other flags.
    Flag,
}

/// Scheduling and probe settings shared by every service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Tick interval in milliseconds.
    pub interval_ms: u64,

    /// Per-probe deadline in milliseconds.
    pub timeout_ms: u64,

    /// Largest response body prefix kept per request; longer bodies are
    /// truncated.
    pub max_body_bytes: usize,

    /// Handling of undecodable liveness payloads.
    pub decode_failure: DecodeFailurePolicy,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            timeout_ms: 1_000,
            max_body_bytes: 64 * 1024,
            decode_failure: DecodeFailurePolicy::Preserve,
        }
    }
}

impl ProbeSettings {
    /// True when one slow round can outlast the tick that started it.
    pub fn may_overrun(&self) -> bool {
        self.timeout_ms >= self.interval_ms
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Scrape endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:8081".to_string(),
        }
    }
}
