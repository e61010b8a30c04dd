//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MonitorConfig, ConfigError> {
    let config: MonitorConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DecodeFailurePolicy;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [monitor]
            interval_ms = 2000
            timeout_ms = 250
            decode_failure = "flag"

            [[services]]
            name = "orders"
            url = "http://127.0.0.1:8080"

            [[services]]
            name = "billing"
            url = "http://127.0.0.1:8090"

            [observability]
            metrics_address = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[1].name, "billing");
        assert_eq!(config.monitor.interval_ms, 2000);
        assert_eq!(config.monitor.timeout_ms, 250);
        assert_eq!(config.monitor.max_body_bytes, 64 * 1024);
        assert_eq!(config.monitor.decode_failure, DecodeFailurePolicy::Flag);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9100");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_config("[monitor\ninterval_ms = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_is_reported() {
        let err = parse_config(
            r#"
            [[services]]
            name = "orders"
            url = "http://a:1"

            [[services]]
            name = "orders"
            url = "http://b:1"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
