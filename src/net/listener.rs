//! TCP listener with a bounded session count.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming CMP-over-TCP connections
//! - Enforce `max_connections` via a semaphore permit per session

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::ListenerConfig;

/// Errors from binding or accepting on the listening socket.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Failed to bind the listening address. Fatal at startup.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// Failed to accept a connection. The accept loop logs and continues.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),
}

/// A bounded TCP listener.
///
/// Each accepted connection holds a semaphore permit for its whole session;
/// once `max_connections` sessions are in flight, further accepts wait
/// until a session ends. Connections beyond that queue in the OS listen
/// backlog.
pub struct Listener {
    inner: TcpListener,
    session_limit: Arc<Semaphore>,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            max_connections = config.max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            session_limit: Arc::new(Semaphore::new(config.max_connections)),
        })
    }

    /// Accept the next connection, waiting for a free session slot first.
    ///
    /// The returned permit must be held for the session's lifetime; dropping
    /// it frees the slot.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, SessionPermit), ListenerError> {
        let permit = self
            .session_limit
            .clone()
            .acquire_owned()
            .await
            .expect("session semaphore closed");

        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(
            peer_addr = %addr,
            available_slots = self.session_limit.available_permits(),
            "Connection accepted"
        );

        Ok((stream, addr, SessionPermit { _permit: permit }))
    }

    /// The local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Session slots currently free.
    pub fn available_slots(&self) -> usize {
        self.session_limit.available_permits()
    }
}

/// A held session slot, released back to the listener on drop.
#[derive(Debug)]
pub struct SessionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
