//! STDIO transport.
//!
//! Reads newline-delimited JSON-RPC from stdin and writes responses to
//! stdout. Stdout carries protocol traffic only; logs go to stderr.

use tokio::io::{BufReader, Stdin, Stdout};

use super::line::LineTransport;

/// Line transport over the process's standard streams.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl LineTransport<BufReader<Stdin>, Stdout> {
    /// Bind to stdin and stdout.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use hellomcp_server::transport::StdioTransport;
    ///
    /// let transport = StdioTransport::stdio().with_max_message_size(1024 * 1024);
    /// # let _ = transport;
    /// ```
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}
