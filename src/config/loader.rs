//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BridgeConfig;
use crate::config::validation::validate_config;

/// Errors raised while loading or validating configuration.
///
/// All of them are fatal at startup, before any socket is bound.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The upstream URI does not parse as an absolute URI.
    #[error("invalid upstream URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The upstream URI scheme is neither http nor https.
    #[error("unsupported upstream URI scheme '{0}': expected http or https")]
    UnsupportedScheme(String),

    /// The listener bind address does not parse as host:port.
    #[error("invalid bind address '{addr}': {reason}")]
    InvalidBindAddress { addr: String, reason: String },
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BridgeConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}
