//! # HelloMCP Server
//!
//! Core of a single-session MCP server speaking newline-delimited JSON-RPC
//! over stdio.
//!
//! - [`CapabilityRegistry`]: tools, resources, and prompts, in registration order
//! - [`DispatchTable`]: method name to typed async handler
//! - [`transport`]: line framing over stdin/stdout or any async stream pair
//! - [`Server`]: the `Created -> Started -> Stopped` serve loop
//! - [`ServiceGroup`] and [`McpService`]: signal-driven graceful shutdown
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hellomcp_server::handler::{tool_fn, ToolError};
//! use hellomcp_server::{McpService, Server, ServerConfig, ServiceGroup, Signal};
//! use hellomcp_types::{Arguments, Tool, ToolResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Arc::new(Server::new(ServerConfig::default()));
//!     server.register_tool(
//!         Tool::new("hello", "Say hello"),
//!         tool_fn(|_args: Arguments| async { Ok::<_, ToolError>(ToolResult::text("Hello!")) }),
//!     )?;
//!
//!     ServiceGroup::new()
//!         .with_service(McpService::stdio(server))
//!         .with_graceful_shutdown_signals([Signal::Terminate, Signal::Interrupt])
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod logging;
pub mod methods;
pub mod registry;
pub mod router;
pub mod server;
pub mod service;
pub mod transport;

pub use config::{ConfigError, LogOutput, LoggingConfig, ServerConfig, ServerConfigBuilder};
pub use dispatch::DispatchTable;
pub use error::{RegistryError, ServerError, ServerResult};
pub use handler::{PromptHandler, ResourceHandler, ToolError, ToolHandler};
pub use registry::CapabilityRegistry;
pub use server::{Server, ServerState};
pub use service::{McpService, Service, ServiceError, ServiceGroup, Signal};
pub use transport::{Transport, TransportError};

/// Default server name reported during `initialize`
pub const SERVER_NAME: &str = "HelloMCP";

/// Server crate version
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
