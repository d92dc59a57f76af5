//! Accept loop and graceful shutdown for the bridge.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Spawn one relay worker task per accepted socket
//! - Stop accepting on the shutdown signal and drain in-flight sessions

use http::Uri;
use tokio::sync::broadcast;

use crate::net::{Listener, SessionTracker};
use crate::relay::RelayWorker;

/// The bridge server: one accept loop feeding per-session worker tasks.
pub struct BridgeServer {
    uri: Uri,
    transcode: bool,
    tracker: SessionTracker,
}

impl BridgeServer {
    /// Create a server relaying to `uri`, with the given transcode flag.
    ///
    /// The URI must already be validated; see `config::validation`.
    pub fn new(uri: Uri, transcode: bool) -> Self {
        Self {
            uri,
            transcode,
            tracker: SessionTracker::new(),
        }
    }

    /// The session tracker, for tests and shutdown reporting.
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Run the accept loop until `shutdown` fires, then drain.
    ///
    /// Accept failures are logged and the loop continues; a transient
    /// accept error must not take the process down. After the shutdown
    /// signal no new connections are accepted, but every in-flight session
    /// finishes its current frame exchange before this returns.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = self.tracker.track();
                        let worker = RelayWorker::new(
                            stream,
                            peer,
                            self.uri.clone(),
                            self.transcode,
                            guard.id(),
                        );
                        tokio::spawn(async move {
                            let _permit = permit;
                            let _guard = guard;
                            worker.run().await;
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                    }
                },
            }
        }

        tracing::info!(
            active_sessions = self.tracker.active_count(),
            "Shutdown signal received, draining sessions"
        );
        self.tracker.wait_idle().await;
        tracing::info!("All sessions drained");
    }
}
