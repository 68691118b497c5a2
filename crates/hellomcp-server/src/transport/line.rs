//! Newline-delimited JSON transport over any buffered reader and writer.
//!
//! Each message is a single line of UTF-8 JSON. Reads are bounded: a line
//! longer than the configured limit is never buffered in full; its bytes are
//! skipped up to the next newline and reported as [`Frame::Oversized`].

use async_trait::async_trait;
use hellomcp_types::protocol::JsonRpcResponse;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{trace, warn};

use super::{Frame, MAX_MESSAGE_SIZE, Transport, TransportError, TransportResult};

/// Trait for types that can read lines.
pub trait LineReader: AsyncBufRead + Unpin + Send + 'static {}
impl<T: AsyncBufRead + Unpin + Send + 'static> LineReader for T {}

/// Trait for types that can write lines.
pub trait LineWriter: AsyncWrite + Unpin + Send + 'static {}
impl<T: AsyncWrite + Unpin + Send + 'static> LineWriter for T {}

/// Line-framed transport.
#[derive(Debug)]
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    max_message_size: usize,
    buf: Vec<u8>,
}

impl<R: LineReader, W: LineWriter> LineTransport<R, W> {
    /// Create a transport with the default message size limit.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_message_size: MAX_MESSAGE_SIZE,
            buf: Vec::new(),
        }
    }

    /// Override the message size limit (minimum 1 byte).
    #[must_use]
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size.max(1);
        self
    }

    /// Current message size limit.
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Consume the transport, returning the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    // Drop bytes up to and including the next newline, or to end of stream.
    async fn discard_line(&mut self) -> std::io::Result<()> {
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    self.reader.consume(pos + 1);
                    return Ok(());
                }
                None => {
                    let len = available.len();
                    self.reader.consume(len);
                }
            }
        }
    }
}

#[async_trait]
impl<R: LineReader, W: LineWriter> Transport for LineTransport<R, W> {
    async fn receive(&mut self) -> TransportResult<Frame> {
        loop {
            self.buf.clear();
            // One byte past the limit distinguishes "exactly at limit" from "over".
            let limit = self.max_message_size as u64 + 1;
            let read = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.buf)
                .await?;
            if read == 0 {
                return Err(TransportError::Closed);
            }

            let terminated = self.buf.last() == Some(&b'\n');
            if !terminated && self.buf.len() > self.max_message_size {
                self.discard_line().await?;
                warn!(
                    limit = self.max_message_size,
                    "Discarded inbound message over size limit"
                );
                return Ok(Frame::Oversized {
                    limit: self.max_message_size,
                });
            }

            if self.buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            return match std::str::from_utf8(&self.buf) {
                Ok(line) => {
                    let line = line.trim();
                    trace!(bytes = line.len(), "Received message");
                    Ok(Frame::Message(line.to_string()))
                }
                Err(_) => Ok(Frame::InvalidUtf8),
            };
        }
    }

    async fn send(&mut self, response: &JsonRpcResponse) -> TransportResult<()> {
        let mut payload = serde_json::to_vec(response)?;
        payload.push(b'\n');
        self.writer.write_all(&payload).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }
}
