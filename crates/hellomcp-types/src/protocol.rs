//! JSON-RPC envelopes and typed method descriptions.
//!
//! Wire format is newline-delimited JSON-RPC 2.0:
//!
//! ```text
//! -> {"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"weather"}}
//! <- {"jsonrpc":"2.0","id":1,"result":{"content":[...],"isError":false}}
//! ```
//!
//! Each protocol method is a zero-sized type implementing [`MethodSpec`], which
//! ties the wire name to its parameter and result types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::arguments::Arguments;
use crate::definitions::ServerInfo;
use crate::error::McpError;
use crate::results::{
    ListPromptsResult, ListResourcesResult, ListToolsResult, PromptResult, ResourceResult,
    ToolResult,
};

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revisions the server accepts, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Incoming JSON-RPC message (request or notification).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    /// Request ID; absent for notifications. An explicit `null` is kept as
    /// `Some(Value::Null)` and still gets a response.
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and receive no response.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

fn jsonrpc_version() -> String {
    JSONRPC_VERSION.to_string()
}

// Only called when the key is present, so `null` maps to `Some(Null)`.
fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Outgoing JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID echoed from the request, `null` when it could not be read
    pub id: Value,
    /// Result (mutually exclusive with error)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (mutually exclusive with result)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(id: Value, error: impl Into<JsonRpcError>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        Self {
            code: err.jsonrpc_code(),
            message: err.message,
        }
    }
}

/// A protocol method with typed parameters and result.
pub trait MethodSpec: Send + Sync + 'static {
    /// Wire name, e.g. `tools/call`
    const NAME: &'static str;
    /// Parameters; decoded from `{}` when the request omits them
    type Params: DeserializeOwned + Send + 'static;
    /// Result payload
    type Result: Serialize + Send + 'static;
}

/// Parameters for list methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListParams {
    /// Opaque cursor; ignored because listings are single-page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolParams {
    /// Tool name
    pub name: String,
    /// Tool arguments
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: Arguments,
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceParams {
    /// Exact resource URI
    pub uri: String,
}

/// Parameters for `prompts/get`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptParams {
    /// Prompt name
    pub name: String,
    /// Template arguments
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: Arguments,
}

/// Parameters for `initialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitializeParams {
    /// Protocol revision requested by the client
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    /// Client identification
    #[serde(rename = "clientInfo", default)]
    pub client_info: Option<ServerInfo>,
    /// Client capabilities (accepted, not interpreted)
    #[serde(default)]
    pub capabilities: Value,
}

/// Result of `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeResult {
    /// Negotiated protocol revision
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities the server offers
    pub capabilities: ServerCapabilities,
    /// Server identification
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Capability flags advertised during `initialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerCapabilities {
    /// Present when at least one tool is registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListChangedCapability>,
    /// Present when at least one resource is registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ListChangedCapability>,
    /// Present when at least one prompt is registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<ListChangedCapability>,
}

/// A capability entry with its list-changed notification flag.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListChangedCapability {
    /// Whether list-changed notifications are sent (never, registries are frozen)
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Empty parameter or result object (`{}`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! method {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $params:ty, $result:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl MethodSpec for $ty {
            const NAME: &'static str = $name;
            type Params = $params;
            type Result = $result;
        }
    };
}

method!(
    /// `initialize` handshake
    Initialize, "initialize", InitializeParams, InitializeResult
);
method!(
    /// `notifications/initialized` notification
    Initialized, "notifications/initialized", Empty, Empty
);
method!(
    /// `ping` liveness check
    Ping, "ping", Empty, Empty
);
method!(
    /// `tools/list`
    ListTools, "tools/list", ListParams, ListToolsResult
);
method!(
    /// `tools/call`
    CallTool, "tools/call", CallToolParams, ToolResult
);
method!(
    /// `resources/list`
    ListResources, "resources/list", ListParams, ListResourcesResult
);
method!(
    /// `resources/read`
    ReadResource, "resources/read", ReadResourceParams, ResourceResult
);
method!(
    /// `prompts/list`
    ListPrompts, "prompts/list", ListParams, ListPromptsResult
);
method!(
    /// `prompts/get`
    GetPrompt, "prompts/get", GetPromptParams, PromptResult
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_request() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "id": 1, "method": "ping"}"#).unwrap();
        assert_eq!(request.method, "ping");
        assert_eq!(request.id, Some(json!(1)));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_notification_has_no_id() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn test_null_id_is_not_a_notification() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert_eq!(request.id, Some(Value::Null));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_error_response_serializes_null_id() {
        let response = JsonRpcResponse::error(Value::Null, McpError::parse_error("bad"));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {"code": -32700, "message": "bad"}
            })
        );
    }

    #[test]
    fn test_call_tool_params_tolerate_missing_or_null_arguments() {
        let params: CallToolParams = serde_json::from_value(json!({"name": "weather"})).unwrap();
        assert!(params.arguments.is_empty());

        let params: CallToolParams =
            serde_json::from_value(json!({"name": "weather", "arguments": null})).unwrap();
        assert!(params.arguments.is_empty());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(ListTools::NAME, "tools/list");
        assert_eq!(CallTool::NAME, "tools/call");
        assert_eq!(ListResources::NAME, "resources/list");
        assert_eq!(ReadResource::NAME, "resources/read");
        assert_eq!(ListPrompts::NAME, "prompts/list");
        assert_eq!(GetPrompt::NAME, "prompts/get");
    }

    #[test]
    fn test_initialize_result_shape() {
        let result = InitializeResult {
            protocol_version: SUPPORTED_PROTOCOL_VERSIONS[0].into(),
            capabilities: ServerCapabilities {
                tools: Some(ListChangedCapability::default()),
                ..Default::default()
            },
            server_info: ServerInfo::new("HelloMCP", "1.0.0"),
        };
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["capabilities"], json!({"tools": {"listChanged": false}}));
        assert_eq!(value["serverInfo"]["name"], "HelloMCP");
    }
}
