//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that addresses and log levels parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};
use thiserror::Error;
use tracing::Level;

use crate::config::schema::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("unknown log level '{0}'")]
    LogLevel(String),
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Check a parsed config for values serde cannot reject on its own.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.shutdown_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.shutdown_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }
    if config.limits.max_limit < 1 {
        errors.push(ValidationError::Zero("limits.max_limit"));
    }
    if config.observability.log_level.parse::<Level>().is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "localhost:80".into();
        config.timeouts.request_secs = 0;
        config.limits.max_limit = 0;
        config.observability.log_level = "verbose".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nope".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("localhost:80".into()),
                ValidationError::Zero("timeouts.request_secs"),
                ValidationError::Zero("limits.max_limit"),
                ValidationError::LogLevel("verbose".into()),
                ValidationError::MetricsAddress("nope".into()),
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = ServerConfig::default();
        config.observability.log_level = "WARN".into();
        assert!(validate_config(&config).is_ok());
    }
}
