//! Server core.
//!
//! A [`Server`] owns the capability registry and the dispatch table, and
//! drives one transport through a sequential serve loop: read a frame,
//! dispatch it, write the response, repeat. One request is in flight at a
//! time, so responses leave in the order requests arrived.
//!
//! Lifecycle is `Created -> Started -> Stopped`, with no way back:
//!
//! ```rust,no_run
//! use hellomcp_server::{Server, ServerConfig};
//! use hellomcp_server::transport::StdioTransport;
//!
//! # async fn run() -> Result<(), hellomcp_server::ServerError> {
//! let server = Server::new(ServerConfig::default());
//! server.start(StdioTransport::stdio()).await?;
//! // ... later
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use hellomcp_types::protocol::{JsonRpcResponse, MethodSpec};
use hellomcp_types::{McpError, McpResult, Prompt, Resource, ServerInfo, Tool};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::dispatch::DispatchTable;
use crate::error::{RegistryError, ServerError, ServerResult};
use crate::handler::{PromptHandler, ResourceHandler, ToolHandler};
use crate::registry::CapabilityRegistry;
use crate::router;
use crate::transport::{Frame, Transport};

/// Server lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Built, accepting registrations, not yet serving
    Created,
    /// Serving a transport
    Started,
    /// Stopped; terminal
    Stopped,
}

#[derive(Debug)]
struct Lifecycle {
    state: ServerState,
    task: Option<JoinHandle<ServerResult<()>>>,
}

/// Single-session protocol server.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    info: ServerInfo,
    registry: Arc<CapabilityRegistry>,
    dispatch: Arc<DispatchTable>,
    lifecycle: Mutex<Lifecycle>,
    shutdown: CancellationToken,
    finished: CancellationToken,
}

impl Server {
    /// Create a server with the built-in protocol methods installed.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let info = ServerInfo::new(config.name.clone(), config.version.clone());
        let registry = Arc::new(CapabilityRegistry::new());
        let dispatch = Arc::new(DispatchTable::new());
        crate::methods::install(&dispatch, &registry, &info);

        Self {
            config,
            info,
            registry,
            dispatch,
            lifecycle: Mutex::new(Lifecycle {
                state: ServerState::Created,
                task: None,
            }),
            shutdown: CancellationToken::new(),
            finished: CancellationToken::new(),
        }
    }

    /// Server identity reported to clients.
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Active configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The capability registry.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ServerState {
        self.lifecycle.lock().await.state
    }

    /// Register a tool. Fails once the server has started.
    pub fn register_tool(
        &self,
        descriptor: Tool,
        handler: impl ToolHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.registry.register_tool(descriptor, handler)
    }

    /// Register a resource. Fails once the server has started.
    pub fn register_resource(
        &self,
        descriptor: Resource,
        handler: impl ResourceHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.registry.register_resource(descriptor, handler)
    }

    /// Register a prompt. Fails once the server has started.
    pub fn register_prompt(
        &self,
        descriptor: Prompt,
        handler: impl PromptHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.registry.register_prompt(descriptor, handler)
    }

    /// Install or replace the handler for method `M`.
    ///
    /// Allowed in any state; the next dispatch of `M` sees the new handler.
    pub fn with_method_handler<M, F, Fut>(&self, handler: F)
    where
        M: MethodSpec,
        F: Fn(M::Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<M::Result>> + Send + 'static,
    {
        self.dispatch.set_handler::<M, F, Fut>(handler);
    }

    /// Begin serving `transport` on a background task.
    ///
    /// Seals the registry. Returns once the serve loop is running.
    ///
    /// # Errors
    ///
    /// [`ServerError::AlreadyStarted`] if running, [`ServerError::Stopped`]
    /// if already stopped.
    pub async fn start<T: Transport>(&self, transport: T) -> ServerResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        match lifecycle.state {
            ServerState::Created => {}
            ServerState::Started => return Err(ServerError::AlreadyStarted),
            ServerState::Stopped => return Err(ServerError::Stopped),
        }

        self.registry.seal();
        let serve = serve(
            transport,
            Arc::clone(&self.dispatch),
            self.shutdown.clone(),
            self.finished.clone(),
        );
        lifecycle.task = Some(tokio::spawn(serve));
        lifecycle.state = ServerState::Started;

        info!(
            name = %self.info.name,
            version = %self.info.version,
            tools = self.registry.tool_count(),
            resources = self.registry.resource_count(),
            prompts = self.registry.prompt_count(),
            "Server started"
        );
        Ok(())
    }

    /// Stop serving.
    ///
    /// The request in flight, if any, completes and its response is written
    /// before this returns, bounded by the configured shutdown timeout. No
    /// frames are read afterwards. Idempotent; stopping a server that never
    /// started moves it straight to `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns the serve loop's error if it had already failed (for example
    /// the peer closed the stream). Only the first caller sees it.
    pub async fn stop(&self) -> ServerResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        let previous = std::mem::replace(&mut lifecycle.state, ServerState::Stopped);
        self.shutdown.cancel();

        match previous {
            ServerState::Stopped => Ok(()),
            ServerState::Created => {
                self.registry.seal();
                self.finished.cancel();
                info!("Server stopped before it started");
                Ok(())
            }
            ServerState::Started => {
                let Some(mut task) = lifecycle.task.take() else {
                    return Ok(());
                };

                let timeout = self.config.shutdown_timeout();
                let outcome = match tokio::time::timeout(timeout, &mut task).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_error)) => Err(ServerError::Task(join_error.to_string())),
                    Err(_) => {
                        warn!(
                            timeout_ms = self.config.shutdown_timeout_ms,
                            "In-flight request did not finish in time, aborting"
                        );
                        task.abort();
                        let _ = task.await;
                        Ok(())
                    }
                };

                match &outcome {
                    Ok(()) => info!("Server stopped"),
                    Err(e) => error!(error = %e, "Server stopped after serve loop failure"),
                }
                outcome
            }
        }
    }

    /// Resolves once the serve loop has exited for any reason.
    pub async fn finished(&self) {
        self.finished.cancelled().await;
    }

    /// Whether `stop` has been requested.
    pub fn is_stopping(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

async fn serve<T: Transport>(
    mut transport: T,
    dispatch: Arc<DispatchTable>,
    shutdown: CancellationToken,
    finished: CancellationToken,
) -> ServerResult<()> {
    let _finished = finished.drop_guard();

    let outcome = serve_frames(&mut transport, &dispatch, &shutdown).await;
    if let Err(e) = transport.close().await {
        debug!(error = %e, "Failed to close transport");
    }

    match &outcome {
        Ok(()) => debug!("Serve loop exited on shutdown"),
        Err(e) if e.is_peer_closed() => info!("Peer closed the connection"),
        Err(e) => error!(error = %e, "Serve loop failed"),
    }
    outcome
}

async fn serve_frames<T: Transport>(
    transport: &mut T,
    dispatch: &DispatchTable,
    shutdown: &CancellationToken,
) -> ServerResult<()> {
    loop {
        // Shutdown wins over a frame that is already readable.
        let frame = tokio::select! {
            biased;
            () = shutdown.cancelled() => return Ok(()),
            frame = transport.receive() => frame,
        };

        let response = match frame {
            Ok(Frame::Message(line)) => router::handle_line(dispatch, &line).await,
            Ok(Frame::Oversized { limit }) => Some(JsonRpcResponse::error(
                Value::Null,
                McpError::invalid_request(format!(
                    "Message exceeds maximum size of {limit} bytes"
                )),
            )),
            Ok(Frame::InvalidUtf8) => Some(JsonRpcResponse::error(
                Value::Null,
                McpError::parse_error("Message is not valid UTF-8"),
            )),
            Err(e) => return Err(e.into()),
        };

        if let Some(response) = response {
            transport.send(&response).await?;
        }
    }
}
