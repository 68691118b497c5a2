//! `chat` tool backed by a language model.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hellomcp_server::{ToolError, ToolHandler};
use hellomcp_types::{Arguments, PropertySchema, Tool, ToolInputSchema, ToolResult};
use thiserror::Error;
use tracing::warn;

/// Whether a model can serve requests right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Ready
    Available,
    /// Not ready, with the reason
    Unavailable(String),
}

/// A failed generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model error: {0}")]
pub struct ModelError(pub String);

/// A text generation backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Probe availability. Checked on every call.
    fn availability(&self) -> Availability;

    /// Generate a response to `prompt` under optional `instructions`.
    async fn respond(&self, instructions: Option<&str>, prompt: &str) -> Result<String, ModelError>;
}

/// A model slot with nothing plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModel;

#[async_trait]
impl LanguageModel for NoModel {
    fn availability(&self) -> Availability {
        Availability::Unavailable("no language model backend is configured".to_string())
    }

    async fn respond(&self, _instructions: Option<&str>, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError("no backend".to_string()))
    }
}

/// Sends a prompt to the language model.
pub struct ChatTool {
    model: Arc<dyn LanguageModel>,
}

impl ChatTool {
    /// Tool backed by `model`.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Descriptor advertised in `tools/list`.
    pub fn descriptor() -> Tool {
        Tool::new("chat", "Send a prompt to the on-device language model").with_schema(
            ToolInputSchema::object()
                .property(
                    "instructions",
                    PropertySchema::string("System instructions for the model"),
                )
                .property("prompt", PropertySchema::string("Prompt to respond to")),
        )
    }
}

#[async_trait]
impl ToolHandler for ChatTool {
    async fn call(&self, arguments: Arguments) -> Result<ToolResult, ToolError> {
        if let Availability::Unavailable(reason) = self.model.availability() {
            return Err(ToolError::unavailable(format!("Model not available: {reason}")));
        }

        let instructions = arguments.optional_str("instructions");
        let prompt = arguments.string_or("prompt", "");
        match self.model.respond(instructions, &prompt).await {
            Ok(text) => Ok(ToolResult::text(text)),
            Err(e) => {
                warn!(error = %e, "Language model failed to respond");
                Err(ToolError::failed("Unable to respond"))
            }
        }
    }
}

impl fmt::Debug for ChatTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatTool").finish_non_exhaustive()
    }
}
