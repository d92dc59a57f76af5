//! Bridge configuration.
//!
//! Set once at startup and read-only for the process lifetime; every
//! session consumes the same upstream URI and transcode flag.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BridgeConfig, ListenerConfig, ObservabilityConfig, UpstreamConfig};
pub use validation::{upstream_uri, validate_config};
