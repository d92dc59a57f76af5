//! Per-connection relay worker.
//!
//! # Responsibilities
//! - Own one accepted TCP connection for its whole session
//! - Loop: decode frame → POST to upstream → write response back
//! - Keep request/response ordering strict (no pipelining)
//! - Close the socket on both clean and error termination
//!
//! The loop is the state machine `AWAITING_FRAME → FORWARDING →
//! WRITING_RESPONSE → AWAITING_FRAME`; a clean disconnect between frames
//! ends the session silently, any error inside an iteration ends it with a
//! warning. Errors never escalate past the worker's task.

use std::net::SocketAddr;

use http::Uri;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::frame::{self, FrameError};
use crate::net::SessionId;
use crate::upstream::{Forwarder, UpstreamError};

/// Errors that terminate a relay session.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Malformed or truncated frame, or a read failure.
    #[error("failed to read frame: {0}")]
    Read(#[source] FrameError),

    /// The outbound POST failed; not retried.
    #[error("upstream forwarding failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// Writing the response back to the peer failed.
    #[error("failed to write response: {0}")]
    Write(#[source] FrameError),
}

/// One worker per accepted connection.
///
/// Holds the socket, the session's forwarder (with its own HTTP client),
/// and the immutable transcode flag. Workers share no mutable state with
/// each other; a slow upstream stalls only its own session.
pub struct RelayWorker {
    stream: TcpStream,
    peer: SocketAddr,
    forwarder: Forwarder,
    transcode: bool,
    id: SessionId,
}

impl RelayWorker {
    /// Create a worker for an accepted connection.
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        uri: Uri,
        transcode: bool,
        id: SessionId,
    ) -> Self {
        Self {
            stream,
            peer,
            forwarder: Forwarder::new(uri),
            transcode,
            id,
        }
    }

    /// Drive the session to completion and close the socket.
    ///
    /// Never returns an error: all failures are logged here and the session
    /// simply ends. The peer observes the socket closing and applies its
    /// own retry policy.
    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.id,
            peer_addr = %self.peer,
            upstream = %self.forwarder.uri(),
            "Session started"
        );

        match self.relay_loop().await {
            Ok(frames) => {
                tracing::info!(
                    session_id = %self.id,
                    frames_relayed = frames,
                    "Session ended"
                );
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %self.id,
                    peer_addr = %self.peer,
                    error = %e,
                    "Session terminated"
                );
            }
        }

        // Close failures are logged, never escalated.
        if let Err(e) = self.stream.shutdown().await {
            tracing::warn!(session_id = %self.id, error = %e, "Failed to close socket");
        }
    }

    /// The relay loop proper. Returns the number of frames relayed on a
    /// clean disconnect.
    async fn relay_loop(&mut self) -> Result<u64, RelayError> {
        let (mut reader, mut writer) = self.stream.split();
        let mut frames = 0u64;

        loop {
            let payload = match frame::read_frame(&mut reader, self.transcode).await {
                Ok(Some(payload)) => payload,
                Ok(None) => return Ok(frames),
                Err(e) => return Err(RelayError::Read(e)),
            };

            tracing::debug!(
                session_id = %self.id,
                payload_len = payload.len(),
                "Forwarding frame"
            );

            let body = self.forwarder.forward(payload).await?;

            frame::write_response(&mut writer, &body, self.transcode)
                .await
                .map_err(RelayError::Write)?;

            frames += 1;
        }
    }
}
