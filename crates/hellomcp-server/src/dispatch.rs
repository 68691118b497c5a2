//! Method dispatch table.
//!
//! Maps JSON-RPC method names to type-erased async handlers. Handlers are
//! installed per [`MethodSpec`] so parameter decoding and result encoding
//! happen in one place:
//!
//! ```rust
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! use hellomcp_server::DispatchTable;
//! use hellomcp_types::protocol::{Empty, Ping};
//!
//! let table = DispatchTable::new();
//! table.set_handler::<Ping, _, _>(|_params: Empty| async { Ok(Empty {}) });
//!
//! let result = table.dispatch("ping", None).await.unwrap();
//! assert_eq!(result, serde_json::json!({}));
//! # });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use hellomcp_types::protocol::MethodSpec;
use hellomcp_types::{McpError, McpResult};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, error};

type ErasedHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, McpResult<Value>> + Send + Sync>;

/// Method name to handler mapping.
///
/// Installing a handler for a method that already has one replaces it.
/// Lookups and installs may interleave; a dispatch already underway keeps
/// the handler it looked up.
#[derive(Default)]
pub struct DispatchTable {
    handlers: RwLock<HashMap<&'static str, ErasedHandler>>,
}

impl DispatchTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for method `M`, replacing any previous one.
    pub fn set_handler<M, F, Fut>(&self, handler: F)
    where
        M: MethodSpec,
        F: Fn(M::Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<M::Result>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(move |params: Value| {
            let handler = Arc::clone(&handler);
            async move {
                let params: M::Params = serde_json::from_value(params).map_err(|e| {
                    McpError::invalid_params(format!("Invalid params for {}: {e}", M::NAME))
                })?;
                let result = handler(params).await?;
                serde_json::to_value(result).map_err(|e| {
                    McpError::internal(format!("Failed to encode {} result: {e}", M::NAME))
                })
            }
            .boxed()
        });

        if self.handlers.write().insert(M::NAME, erased).is_some() {
            debug!(method = M::NAME, "Replaced method handler");
        }
    }

    /// Whether a handler is installed for `method`.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.handlers.read().contains_key(method)
    }

    /// Installed method names, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        let mut methods: Vec<_> = self.handlers.read().keys().copied().collect();
        methods.sort_unstable();
        methods
    }

    /// Run the handler for `method`.
    ///
    /// Absent params decode as `{}`. A handler that panics yields an
    /// internal error instead of unwinding into the caller.
    pub async fn dispatch(&self, method: &str, params: Option<Value>) -> McpResult<Value> {
        let handler = self.handlers.read().get(method).cloned();
        let Some(handler) = handler else {
            return Err(McpError::method_not_found(method));
        };

        let params = params.unwrap_or_else(|| Value::Object(Map::new()));
        match AssertUnwindSafe(handler(params)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(method, %reason, "Method handler panicked");
                Err(McpError::internal(format!("Internal error handling {method}")))
            }
        }
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("methods", &self.methods())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hellomcp_types::protocol::{Empty, ListTools, Ping, ReadResource, ReadResourceParams};
    use hellomcp_types::{ErrorKind, ListToolsResult, ResourceResult};
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_method() {
        let table = DispatchTable::new();
        let err = table.dispatch("nope/nothing", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::MethodNotFound);
        assert_eq!(err.message, "Method not found: nope/nothing");
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let table = DispatchTable::new();
        table.set_handler::<ListTools, _, _>(|_| async { Ok(ListToolsResult::default()) });
        table.set_handler::<ListTools, _, _>(|_| async {
            Err(McpError::internal("second handler"))
        });

        let err = table.dispatch("tools/list", None).await.unwrap_err();
        assert_eq!(err.message, "second handler");
        assert_eq!(table.methods(), vec!["tools/list"]);
    }

    #[tokio::test]
    async fn test_invalid_params_rejected_before_handler() {
        let table = DispatchTable::new();
        table.set_handler::<ReadResource, _, _>(|params: ReadResourceParams| async move {
            Ok(ResourceResult::text(params.uri, "body"))
        });

        let err = table
            .dispatch("resources/read", Some(json!({"url": "typo"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParams);

        let ok = table
            .dispatch("resources/read", Some(json!({"uri": "resource://x"})))
            .await
            .unwrap();
        assert_eq!(ok["contents"][0]["text"], "body");
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_internal_error() {
        let table = DispatchTable::new();
        table.set_handler::<Ping, _, _>(|_params: Empty| async {
            if true {
                panic!("boom");
            }
            Ok(Empty {})
        });

        let err = table.dispatch("ping", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);

        // The table keeps working afterwards.
        table.set_handler::<Ping, _, _>(|_params: Empty| async { Ok(Empty {}) });
        assert_eq!(table.dispatch("ping", None).await.unwrap(), json!({}));
    }
}
