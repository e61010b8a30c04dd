//! Configuration validation.
//!
//! Serde handles syntax; this module checks what serde cannot: unique
//! service names, well-formed probe URLs, non-zero durations. Every problem
//! is reported, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no services configured")]
    NoServices,

    #[error("service #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate service name '{name}'")]
    DuplicateName { name: String },

    #[error("service '{name}' has an invalid url '{url}': {reason}")]
    InvalidUrl { name: String, url: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = HashSet::new();
    for (index, service) in config.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                name: service.name.clone(),
            });
        }

        if let Err(reason) = check_url(&service.url) {
            errors.push(ValidationError::InvalidUrl {
                name: service.name.clone(),
                url: service.url.clone(),
                reason,
            });
        }
    }

    let monitor = &config.monitor;
    if monitor.interval_ms == 0 {
        errors.push(ValidationError::Zero { field: "monitor.interval_ms" });
    }
    if monitor.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "monitor.timeout_ms" });
    }
    if monitor.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "monitor.max_body_bytes" });
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
