//! Server error types
//!
//! Protocol failures travel as [`McpError`](hellomcp_types::McpError) inside
//! response envelopes and never show up here. The types in this module are
//! for the server's own operations: registration, lifecycle transitions, and
//! the serve loop.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors from server lifecycle operations
#[derive(Debug, Error)]
pub enum ServerError {
    /// `start` called on a server that is already running
    #[error("server already started")]
    AlreadyStarted,

    /// `start` called on a server that has been stopped
    #[error("server has been stopped")]
    Stopped,

    /// The transport failed; fatal to the serve loop
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A capability could not be registered
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The serve task panicked or was cancelled by the runtime
    #[error("serve task failed: {0}")]
    Task(String),
}

impl ServerError {
    /// Whether the serve loop ended because the peer closed the stream
    #[must_use]
    pub fn is_peer_closed(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Closed))
    }
}

/// Errors from capability registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A capability with the same key is already registered
    #[error("{kind} '{key}' is already registered")]
    Duplicate {
        /// Capability kind (tool, resource, prompt)
        kind: &'static str,
        /// Name or URI
        key: String,
    },

    /// Registration attempted after the server started
    #[error("cannot register {kind} '{key}': the server has already started")]
    Sealed {
        /// Capability kind (tool, resource, prompt)
        kind: &'static str,
        /// Name or URI
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_messages() {
        let err = RegistryError::Duplicate {
            kind: "tool",
            key: "weather".into(),
        };
        assert_eq!(err.to_string(), "tool 'weather' is already registered");

        let err = RegistryError::Sealed {
            kind: "prompt",
            key: "interview".into(),
        };
        assert!(err.to_string().contains("already started"));
    }

    #[test]
    fn test_peer_closed_detection() {
        assert!(ServerError::Transport(TransportError::Closed).is_peer_closed());
        assert!(!ServerError::AlreadyStarted.is_peer_closed());
    }
}
