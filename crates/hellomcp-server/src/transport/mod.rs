//! Transport layer.
//!
//! A transport yields inbound frames and writes outbound responses. The
//! server drives exactly one transport per session and never reads or
//! writes the underlying streams directly.

use async_trait::async_trait;
use hellomcp_types::protocol::JsonRpcResponse;
use thiserror::Error;

pub mod line;
pub mod stdio;

pub use line::{LineReader, LineTransport, LineWriter};
pub use stdio::StdioTransport;

/// Default limit on a single inbound message, in bytes (10 MB).
pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport failures. All of them are fatal to the serve loop.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the inbound stream
    #[error("connection closed by peer")]
    Closed,

    /// Reading or writing the stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One inbound unit read from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete, non-blank message
    Message(String),
    /// A message longer than the limit; its bytes were discarded
    Oversized {
        /// The limit that was exceeded
        limit: usize,
    },
    /// A message that is not valid UTF-8
    InvalidUtf8,
}

/// A bidirectional message channel.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Wait for the next inbound frame.
    ///
    /// Returns [`TransportError::Closed`] at end of stream.
    async fn receive(&mut self) -> TransportResult<Frame>;

    /// Write one response and flush it.
    async fn send(&mut self, response: &JsonRpcResponse) -> TransportResult<()>;

    /// Flush and release the outbound side.
    async fn close(&mut self) -> TransportResult<()>;
}
