//! Configuration validation.
//!
//! # Responsibilities
//! - Check the upstream URI parses as an absolute http/https URI
//! - Check the bind address parses as host:port
//!
//! Runs before any socket is bound; a violation aborts startup.

use std::net::SocketAddr;

use http::Uri;

use crate::config::loader::ConfigError;
use crate::config::schema::BridgeConfig;

/// Validate the whole configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), ConfigError> {
    upstream_uri(config)?;

    config
        .listener
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidBindAddress {
            addr: config.listener.bind_address.clone(),
            reason: e.to_string(),
        })?;

    Ok(())
}

/// Parse and check the configured upstream URI.
///
/// The URI must be absolute with an http or https scheme; the `url` parse
/// catches relative and garbage inputs, the `http::Uri` conversion yields
/// the type the HTTP client consumes.
pub fn upstream_uri(config: &BridgeConfig) -> Result<Uri, ConfigError> {
    let raw = &config.upstream.uri;

    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidUri {
        uri: raw.clone(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }

    raw.parse::<Uri>().map_err(|e| ConfigError::InvalidUri {
        uri: raw.clone(),
        reason: e.to_string(),
    })
}
