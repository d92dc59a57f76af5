//! CMP TCP-to-HTTP bridge.
//!
//! Accepts the length-prefixed CMP-over-TCP transport
//! (draft-ietf-pkix-cmp-tcp-00) on a listening socket and relays each
//! request payload as an HTTP POST (`application/pkixcmp`,
//! draft-ietf-pkix-cmp-http-00) to a fixed upstream endpoint, writing the
//! response body back over the same connection.
//!
//! ```text
//!  CMP client ──TCP frame──▶ net ──▶ relay worker ──POST──▶ upstream CA
//!  CMP client ◀──raw bytes── frame ◀── relay worker ◀─body── upstream CA
//! ```
//!
//! One worker task per accepted connection; frames on a connection are
//! relayed strictly in order, and an optional base64 transcoding step is
//! applied to payloads crossing the TCP↔HTTP boundary.

pub mod config;
pub mod frame;
pub mod lifecycle;
pub mod net;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::BridgeConfig;
pub use lifecycle::Shutdown;
pub use server::BridgeServer;
