//! Capability implementation interfaces.
//!
//! Tools, resources, and prompts are registered as a descriptor plus one of
//! these handlers. Concrete behavior lives outside the server core; the core
//! only routes to it.
//!
//! Closures can be adapted with [`tool_fn`], [`resource_fn`], and
//! [`prompt_fn`]:
//!
//! ```rust
//! use hellomcp_server::handler::{tool_fn, ToolError};
//! use hellomcp_types::{Arguments, ToolResult};
//!
//! let echo = tool_fn(|args: Arguments| async move {
//!     let text = args.require_str("text")?;
//!     Ok::<_, ToolError>(ToolResult::text(text))
//! });
//! # let _ = echo;
//! ```

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use hellomcp_types::{ArgumentError, Arguments, McpResult, PromptResult, ResourceResult, ToolResult};
use thiserror::Error;

/// Data-plane failure of a tool.
///
/// Returned errors are reported to the client as `isError: true` results
/// carrying the error text, never as protocol errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// An argument was missing or had the wrong type
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The capability backing the tool is not available right now
    #[error("{0}")]
    Unavailable(String),

    /// The tool ran and failed
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    /// Create an unavailable error
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a failure
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A callable tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the tool. Required arguments declared in the descriptor's
    /// input schema have already been checked for presence.
    async fn call(&self, arguments: Arguments) -> Result<ToolResult, ToolError>;
}

/// A readable resource.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Read the resource at `uri` (always the registered URI).
    async fn read(&self, uri: &str) -> McpResult<ResourceResult>;
}

/// A prompt template.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    /// Render the prompt, substituting defaults for missing optional arguments.
    async fn get(&self, arguments: Arguments) -> McpResult<PromptResult>;
}

/// Tool backed by a closure.
pub struct FnTool<F>(F);

/// Resource backed by a closure.
pub struct FnResource<F>(F);

/// Prompt backed by a closure.
pub struct FnPrompt<F>(F);

/// Adapt an async closure into a [`ToolHandler`].
pub fn tool_fn<F, Fut>(f: F) -> FnTool<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, ToolError>> + Send,
{
    FnTool(f)
}

/// Adapt an async closure into a [`ResourceHandler`].
pub fn resource_fn<F, Fut>(f: F) -> FnResource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = McpResult<ResourceResult>> + Send,
{
    FnResource(f)
}

/// Adapt an async closure into a [`PromptHandler`].
pub fn prompt_fn<F, Fut>(f: F) -> FnPrompt<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = McpResult<PromptResult>> + Send,
{
    FnPrompt(f)
}

#[async_trait]
impl<F, Fut> ToolHandler for FnTool<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, ToolError>> + Send,
{
    async fn call(&self, arguments: Arguments) -> Result<ToolResult, ToolError> {
        (self.0)(arguments).await
    }
}

#[async_trait]
impl<F, Fut> ResourceHandler for FnResource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = McpResult<ResourceResult>> + Send,
{
    async fn read(&self, uri: &str) -> McpResult<ResourceResult> {
        (self.0)(uri.to_string()).await
    }
}

#[async_trait]
impl<F, Fut> PromptHandler for FnPrompt<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = McpResult<PromptResult>> + Send,
{
    async fn get(&self, arguments: Arguments) -> McpResult<PromptResult> {
        (self.0)(arguments).await
    }
}

impl<F> fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTool")
    }
}

impl<F> fmt::Debug for FnResource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnResource")
    }
}

impl<F> fmt::Debug for FnPrompt<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnPrompt")
    }
}
