//! Protocol-level error handling.
//!
//! [`McpError`] is the single error type that crosses the wire. It is reserved
//! for protocol failures: malformed requests, unknown methods, unknown
//! resources or prompts, and internal failures caught at the dispatch
//! boundary. Tool failures are data-plane results (`isError: true`) and never
//! use this type.
//!
//! ```rust
//! use hellomcp_types::error::{ErrorKind, McpError};
//!
//! let err = McpError::invalid_params("Unknown resource URI: resource://nope");
//! assert_eq!(err.kind, ErrorKind::InvalidParams);
//! assert_eq!(err.jsonrpc_code(), -32602);
//! ```

use core::fmt;
use serde::{Deserialize, Serialize};

/// Result type alias for protocol operations
pub type McpResult<T> = core::result::Result<T, McpError>;

/// Unified protocol error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpError {
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

/// Error classification, one variant per JSON-RPC error code this server emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Parse error (-32700)
    ParseError,
    /// Invalid request (-32600)
    InvalidRequest,
    /// Method not found (-32601)
    MethodNotFound,
    /// Invalid params (-32602)
    InvalidParams,
    /// Internal error (-32603)
    Internal,
}

impl McpError {
    /// JSON-RPC code for parse errors
    pub const PARSE_ERROR: i32 = -32700;
    /// JSON-RPC code for invalid requests
    pub const INVALID_REQUEST: i32 = -32600;
    /// JSON-RPC code for unknown methods
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// JSON-RPC code for invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// JSON-RPC code for internal errors
    pub const INTERNAL_ERROR: i32 = -32603;

    /// Create a new error with kind and message
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, message)
    }

    /// Create an invalid request error
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Create a method not found error
    #[must_use]
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::MethodNotFound,
            format!("Method not found: {}", method.into()),
        )
    }

    /// Create an invalid params error
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParams, message)
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Get the JSON-RPC error code for this error
    #[must_use]
    pub const fn jsonrpc_code(&self) -> i32 {
        self.kind.code()
    }
}

impl ErrorKind {
    /// JSON-RPC error code
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => McpError::PARSE_ERROR,
            Self::InvalidRequest => McpError::INVALID_REQUEST,
            Self::MethodNotFound => McpError::METHOD_NOT_FOUND,
            Self::InvalidParams => McpError::INVALID_PARAMS,
            Self::Internal => McpError::INTERNAL_ERROR,
        }
    }

    /// Get a human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid parameters",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for McpError {}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_syntax() || err.is_eof() {
            ErrorKind::ParseError
        } else if err.is_data() {
            ErrorKind::InvalidParams
        } else {
            ErrorKind::Internal
        };
        Self::new(kind, format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_error_creation() {
        let err = McpError::invalid_params("missing field");
        assert_eq!(err.kind, ErrorKind::InvalidParams);
        assert!(err.message.contains("missing field"));
    }

    #[test]
    fn test_jsonrpc_codes() {
        assert_eq!(McpError::parse_error("x").jsonrpc_code(), -32700);
        assert_eq!(McpError::invalid_request("x").jsonrpc_code(), -32600);
        assert_eq!(McpError::method_not_found("x").jsonrpc_code(), -32601);
        assert_eq!(McpError::invalid_params("x").jsonrpc_code(), -32602);
        assert_eq!(McpError::internal("x").jsonrpc_code(), -32603);
    }

    #[test]
    fn test_method_not_found_names_method() {
        let err = McpError::method_not_found("tools/frobnicate");
        assert_eq!(err.message, "Method not found: tools/frobnicate");
    }

    #[test]
    fn test_serde_json_error_classification() {
        let syntax = serde_json::from_str::<Value>("{not json").unwrap_err();
        assert_eq!(McpError::from(syntax).kind, ErrorKind::ParseError);

        let data = serde_json::from_str::<u32>("\"text\"").unwrap_err();
        assert_eq!(McpError::from(data).kind, ErrorKind::InvalidParams);
    }
}
