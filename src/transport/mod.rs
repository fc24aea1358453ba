//! Request/response transport to the search backend.
//!
//! The backend speaks a minimal protocol over a plain TCP stream: the client
//! sends the query text as raw bytes (no delimiter, no length prefix) and the
//! backend answers with newline-separated result identifiers, then closes.
//!
//! There is no explicit end-of-response marker, so the client has to infer
//! it. Two [`Framing`] modes are supported:
//!
//! - [`Framing::ShortRead`]: stop at the first read that returns fewer bytes
//!   than the buffer holds. This matches the reference backend but a response
//!   whose last chunk exactly fills the buffer causes one extra read, and a
//!   response that arrives in several short TCP segments is cut at the first.
//! - [`Framing::UntilClose`]: keep reading until the backend closes the
//!   connection.
//!
//! One connection is opened per query and dropped when the exchange ends,
//! whether it succeeded or not.

pub mod mock;

pub use mock::MockTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::BackendConfig;
use crate::models::Query;

/// How the end of a response is detected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// End at the first read shorter than the buffer
    #[default]
    ShortRead,
    /// End when the peer closes the connection
    UntilClose,
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framing::ShortRead => f.write_str("short-read"),
            Framing::UntilClose => f.write_str("until-close"),
        }
    }
}

/// The complete bytes of one backend response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse(Vec<u8>);

impl RawResponse {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the response as UTF-8, replacing invalid sequences.
    pub fn into_text(self) -> String {
        match String::from_utf8(self.0) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Backend response is not valid UTF-8 - decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        }
    }
}

impl From<&str> for RawResponse {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// The Transport trait sends one query and returns the full response.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `query` to the backend and collect its response.
    async fn query(&self, query: &Query) -> Result<RawResponse, TransportError>;
}

/// Errors that can occur while talking to the backend
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Endpoint unreachable, refused, or the connection was reset
    #[error("Connection to {address} failed: {message}")]
    Connection { address: String, message: String },

    /// Connecting took longer than the configured timeout
    #[error("Connection to {address} timed out after {seconds}s")]
    Timeout { address: String, seconds: u64 },

    /// Writing the query failed
    #[error("Send error: {0}")]
    Send(String),

    /// Reading the response failed
    #[error("Read error: {0}")]
    Read(String),
}

impl TransportError {
    /// Whether this error means the backend could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            TransportError::Connection { .. } | TransportError::Timeout { .. }
        )
    }

    fn send(err: io::Error, address: &str) -> Self {
        if is_connection_kind(err.kind()) {
            TransportError::Connection {
                address: address.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Send(err.to_string())
        }
    }

    fn read(err: io::Error, address: &str) -> Self {
        if is_connection_kind(err.kind()) {
            TransportError::Connection {
                address: address.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Read(err.to_string())
        }
    }
}

fn is_connection_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
    )
}

/// Write `payload` to `stream`, then read the response under `framing`.
///
/// `address` is only used to label connection errors.
pub async fn exchange<S>(
    stream: &mut S,
    address: &str,
    payload: &[u8],
    framing: Framing,
    buffer_size: usize,
) -> Result<RawResponse, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(payload)
        .await
        .map_err(|e| TransportError::send(e, address))?;
    stream
        .flush()
        .await
        .map_err(|e| TransportError::send(e, address))?;

    read_response(stream, address, framing, buffer_size).await
}

/// Read from `reader` into a fixed-size buffer until `framing` says the
/// response is complete.
pub async fn read_response<R>(
    reader: &mut R,
    address: &str,
    framing: Framing,
    buffer_size: usize,
) -> Result<RawResponse, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut response = Vec::new();
    let mut reads = 0usize;

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| TransportError::read(e, address))?;
        reads += 1;
        response.extend_from_slice(&buf[..n]);

        let done = match framing {
            Framing::ShortRead => n < buf.len(),
            Framing::UntilClose => n == 0,
        };
        if done {
            break;
        }
    }

    tracing::debug!(
        "Read {} bytes in {} reads from {} ({})",
        response.len(),
        reads,
        address,
        framing
    );

    Ok(RawResponse(response))
}

/// TCP transport that opens a fresh connection for every query.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    address: String,
    connect_timeout: Duration,
    read_buffer_size: usize,
    framing: Framing,
}

impl TcpTransport {
    /// Create a transport for `address` (`host:port`) with default settings.
    pub fn new(address: impl Into<String>) -> Self {
        Self::from_config(&BackendConfig::default()).address(address)
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            address: config.address(),
            connect_timeout: config.connect_timeout(),
            read_buffer_size: config.read_buffer_size.max(1),
            framing: config.framing,
        }
    }

    /// Set the backend address
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read buffer size
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Set the framing mode
    pub fn framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<TcpStream, TransportError> {
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address)).await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(TransportError::Connection {
                address: self.address.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(TransportError::Timeout {
                address: self.address.clone(),
                seconds: self.connect_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn query(&self, query: &Query) -> Result<RawResponse, TransportError> {
        let mut stream = self.connect().await?;
        tracing::debug!("Connected to {}", self.address);

        // The stream is dropped (and the socket closed) on every return path.
        exchange(
            &mut stream,
            &self.address,
            query.as_bytes(),
            self.framing,
            self.read_buffer_size,
        )
        .await
    }
}
