//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values taken from the command line or environment (`PORT`, `LOG_LEVEL`).
/// They win over both defaults and the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Apply every set override to `config`.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then overrides. Validation runs once on the merged result.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ServerConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
