//! Per-message processing: decode, dispatch, build the response.
//!
//! Every request yields exactly one response carrying its id; notifications
//! yield none. Messages that cannot be decoded are answered with `id: null`.

use hellomcp_types::McpError;
use hellomcp_types::protocol::{JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use tracing::{debug, warn};

use crate::dispatch::DispatchTable;

/// Decode one line into a request, or the error response to send instead.
pub fn parse_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        JsonRpcResponse::error(Value::Null, McpError::parse_error(format!("Parse error: {e}")))
    })?;

    // Keep the id if there is one so the client can correlate the rejection.
    let id = value
        .get("id")
        .filter(|id| id.is_string() || id.is_number())
        .cloned()
        .unwrap_or(Value::Null);

    let request: JsonRpcRequest = serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::error(
            id.clone(),
            McpError::invalid_request(format!("Invalid request: {e}")),
        )
    })?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(JsonRpcResponse::error(
            id,
            McpError::invalid_request(format!(
                "Unsupported JSON-RPC version: {}",
                request.jsonrpc
            )),
        ));
    }

    Ok(request)
}

/// Dispatch a decoded request. Returns `None` for notifications.
pub async fn route_request(table: &DispatchTable, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let notification = request.is_notification();
    let JsonRpcRequest {
        id, method, params, ..
    } = request;

    debug!(%method, id = ?id, "Dispatching");
    let outcome = table.dispatch(&method, params).await;
    if notification {
        if let Err(err) = outcome {
            debug!(%method, error = %err, "Notification handler failed");
        }
        return None;
    }
    let id = id.unwrap_or(Value::Null);

    Some(match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(err) => {
            warn!(%method, code = err.jsonrpc_code(), error = %err, "Request failed");
            JsonRpcResponse::error(id, err)
        }
    })
}

/// Process one raw line end to end.
pub async fn handle_line(table: &DispatchTable, line: &str) -> Option<JsonRpcResponse> {
    match parse_request(line) {
        Ok(request) => route_request(table, request).await,
        Err(response) => {
            warn!("Rejected undecodable message");
            Some(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hellomcp_types::McpError;
    use hellomcp_types::protocol::{Empty, Initialized, Ping};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table() -> DispatchTable {
        let table = DispatchTable::new();
        table.set_handler::<Ping, _, _>(|_: Empty| async { Ok(Empty {}) });
        table
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let response = parse_request("{not json").unwrap_err();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, McpError::PARSE_ERROR);
    }

    #[test]
    fn test_invalid_request_keeps_id() {
        let response = parse_request(r#"{"jsonrpc":"2.0","id":7}"#).unwrap_err();
        assert_eq!(response.id, json!(7));
        assert_eq!(response.error.unwrap().code, McpError::INVALID_REQUEST);

        let response = parse_request(r#"[1, 2, 3]"#).unwrap_err();
        assert_eq!(response.id, Value::Null);
    }

    #[test]
    fn test_wrong_jsonrpc_version() {
        let response = parse_request(r#"{"jsonrpc":"1.0","id":"a","method":"ping"}"#).unwrap_err();
        assert_eq!(response.id, json!("a"));
        assert!(response.error.unwrap().message.contains("1.0"));
    }

    #[tokio::test]
    async fn test_request_echoes_id() {
        let response = handle_line(&table(), r#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, json!("abc"));
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_null_id_request_is_answered() {
        let response = handle_line(&table(), r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.result, Some(json!({})));

        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["id"], Value::Null);
        assert!(wire.as_object().unwrap().contains_key("id"));
    }

    #[tokio::test]
    async fn test_unknown_method_error_response() {
        let response = handle_line(&table(), r#"{"jsonrpc":"2.0","id":2,"method":"nope"}"#)
            .await
            .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, McpError::METHOD_NOT_FOUND);
        assert_eq!(response.id, json!(2));
    }

    #[tokio::test]
    async fn test_notification_is_dispatched_without_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let table = table();
        let counter = Arc::clone(&calls);
        table.set_handler::<Initialized, _, _>(move |_: Empty| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(Empty {}) }
        });

        let response = handle_line(
            &table,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;
        assert!(response.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Unknown notifications are dropped silently too.
        assert!(handle_line(&table, r#"{"jsonrpc":"2.0","method":"x/y"}"#).await.is_none());
    }
}
