//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file;
//! every field has a default so a bare config (or none at all) runs the
//! bridge on its historical defaults.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listening socket settings.
    pub listener: ListenerConfig,

    /// Upstream endpoint settings.
    pub upstream: UpstreamConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:7777").
    pub bind_address: String,

    /// Maximum concurrent sessions; further accepts wait for a free slot.
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:7777".to_string(),
            max_connections: 30,
        }
    }
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Absolute http/https URI every frame payload is POSTed to.
    pub uri: String,

    /// Base64-transcode payloads crossing the TCP↔HTTP boundary:
    /// inbound TCP payloads are base64-encoded before the POST, and the
    /// upstream response body is base64-decoded before the TCP write.
    pub transcode: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            uri: "http://127.0.0.1:8080/".to_string(),
            transcode: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
