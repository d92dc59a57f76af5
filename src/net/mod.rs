//! TCP acceptance and session accounting.

pub mod connection;
pub mod listener;

pub use connection::{SessionGuard, SessionId, SessionTracker};
pub use listener::{Listener, ListenerError, SessionPermit};
