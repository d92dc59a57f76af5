//! Length-prefixed frame codec for the TCP side of the bridge.
//!
//! # Responsibilities
//! - Decode one request frame from the socket input stream
//! - Distinguish a clean end-of-session from a truncated frame
//! - Write the upstream response back without re-framing
//! - Apply the optional base64 transcoding step in both directions
//!
//! # Wire format (big-endian)
//!
//! ```text
//! +----------------+----------------+-------------------------+
//! | length (4B,u32)| header (3B)    | payload (length-3 bytes)|
//! +----------------+----------------+-------------------------+
//! ```
//!
//! `length` counts the header plus payload, so a whole frame occupies
//! `length + 4` bytes on the wire. The 3 header bytes are consumed to keep
//! the stream aligned but are otherwise opaque to the bridge.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Fixed header segment inside every frame, counted by the length prefix.
pub const HEADER_LEN: usize = 3;

/// Size of the length prefix itself, not counted by it.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Errors produced while decoding or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended after a frame had started but before it completed.
    #[error("stream ended mid-frame")]
    Truncated,

    /// The length prefix is too small to cover the fixed header.
    #[error("frame length {0} is smaller than the {HEADER_LEN}-byte header")]
    BadLength(u32),

    /// A transcoded response body was not valid base64.
    #[error("response body is not valid base64: {0}")]
    Transcode(#[from] base64::DecodeError),

    /// Socket read or write failure.
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode one frame from `reader`.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly between
/// frames (end-of-stream before the first byte of the length prefix).
/// End-of-stream anywhere inside a frame is [`FrameError::Truncated`].
///
/// With `transcode` enabled the returned bytes are the base64 encoding of
/// the payload read off the wire.
pub async fn read_frame<R>(reader: &mut R, transcode: bool) -> Result<Option<Vec<u8>>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let length = match read_length_prefix(reader).await? {
        Some(length) => length,
        None => return Ok(None),
    };

    if (length as usize) < HEADER_LEN {
        return Err(FrameError::BadLength(length));
    }

    // Header bytes are consumed for stream alignment only.
    let mut header = [0u8; HEADER_LEN];
    read_exact_or_truncated(reader, &mut header).await?;

    let mut payload = vec![0u8; length as usize - HEADER_LEN];
    read_exact_or_truncated(reader, &mut payload).await?;

    if transcode {
        Ok(Some(BASE64.encode(&payload).into_bytes()))
    } else {
        Ok(Some(payload))
    }
}

/// Write the upstream response body back to the peer.
///
/// The bytes are written verbatim; no length prefix or header is added.
/// With `transcode` enabled the body is base64-decoded first. The write is
/// flushed before returning so the response is fully committed before the
/// caller starts decoding the next frame.
pub async fn write_response<W>(
    writer: &mut W,
    body: &[u8],
    transcode: bool,
) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    if transcode {
        let decoded = BASE64.decode(body)?;
        writer.write_all(&decoded).await?;
    } else {
        writer.write_all(body).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Read the 4-byte length prefix, byte-filling so the clean-EOF case
/// (zero bytes available at a frame boundary) stays distinguishable from
/// a prefix cut short mid-read.
async fn read_length_prefix<R>(reader: &mut R) -> Result<Option<u32>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; LENGTH_PREFIX_LEN];
    let mut filled = 0;

    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(FrameError::Truncated);
        }
        filled += n;
    }

    Ok(Some(u32::from_be_bytes(buf)))
}

/// `read_exact` with end-of-stream mapped to [`FrameError::Truncated`].
async fn read_exact_or_truncated<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(FrameError::Truncated),
        Err(e) => Err(FrameError::Io(e)),
    }
}
