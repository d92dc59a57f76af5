//! Shared utilities for integration testing.

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// One POST as seen by the mock upstream.
#[derive(Debug)]
pub struct ReceivedRequest {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Start a mock upstream that records every POST it receives and replies
/// 200 with a fixed body. Handles keep-alive connections, since the
/// bridge's HTTP client reuses its upstream connection across frames.
///
/// Returns the bound address and a receiver yielding requests in arrival
/// order.
pub async fn start_mock_upstream(
    response: &'static [u8],
) -> (SocketAddr, mpsc::UnboundedReceiver<ReceivedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        loop {
                            let request = match read_http_request(&mut socket).await {
                                Some(r) => r,
                                None => break,
                            };
                            let _ = tx.send(request);

                            let head = format!(
                                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/pkixcmp\r\n\r\n",
                                response.len()
                            );
                            if socket.write_all(head.as_bytes()).await.is_err() {
                                break;
                            }
                            if socket.write_all(response).await.is_err() {
                                break;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Minimal HTTP/1.1 request parser: headers up to CRLFCRLF, then a
/// Content-Length-delimited body. Returns `None` on EOF.
async fn read_http_request(socket: &mut TcpStream) -> Option<ReceivedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = header_value(&head, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let content_type = header_value(&head, "content-type").unwrap_or_default();

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Some(ReceivedRequest { content_type, body })
}

fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Build one wire frame: 4-byte big-endian length, 3-byte header, payload.
#[allow(dead_code)]
pub fn frame(header: [u8; 3], payload: &[u8]) -> Vec<u8> {
    let length = (3 + payload.len()) as u32;
    let mut bytes = length.to_be_bytes().to_vec();
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(payload);
    bytes
}
