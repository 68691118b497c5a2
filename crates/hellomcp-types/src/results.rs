//! Result types for the six capability methods.
//!
//! - `ToolResult` - `tools/call`
//! - `ResourceResult` - `resources/read`
//! - `PromptResult` - `prompts/get`
//! - `ListToolsResult`, `ListResourcesResult`, `ListPromptsResult` - listings
//!
//! ```
//! use hellomcp_types::ToolResult;
//!
//! let ok = ToolResult::text("42");
//! assert!(!ok.is_error);
//!
//! let failed = ToolResult::error("Unknown tool");
//! assert!(failed.is_error);
//! ```

use serde::{Deserialize, Serialize};

use crate::content::{Content, Message};
use crate::definitions::{Prompt, Resource, Tool};

/// Default MIME type for resource contents.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Result from calling a tool.
///
/// `is_error` marks a handler-level failure that is still a well-formed
/// protocol response; clients must inspect the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    /// Content blocks in the result
    pub content: Vec<Content>,
    /// Whether this result represents a failure
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    /// Create a failed text result.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }

    /// Get the first text content if present.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(Content::as_text)
    }
}

/// Result from reading a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceResult {
    /// Resource contents
    pub contents: Vec<ResourceContent>,
}

impl ResourceResult {
    /// Create a single-item text result with the default MIME type.
    #[must_use]
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContent::text(uri, text)],
        }
    }

    /// Create a single-item result with an explicit MIME type.
    #[must_use]
    pub fn with_mime_type(
        uri: impl Into<String>,
        text: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            contents: vec![ResourceContent::text(uri, text).mime_type(mime_type)],
        }
    }

    /// Get the first text content if present.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.contents.first().map(|c| c.text.as_str())
    }
}

/// A single item of resource content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceContent {
    /// URI of the item
    pub uri: String,
    /// MIME type, `text/plain` unless stated otherwise
    #[serde(rename = "mimeType", default = "default_mime_type")]
    pub mime_type: String,
    /// Text content
    pub text: String,
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

impl ResourceContent {
    /// Create text content with the default MIME type.
    #[must_use]
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: default_mime_type(),
            text: text.into(),
        }
    }

    /// Override the MIME type.
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Result from getting a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromptResult {
    /// Description of the rendered prompt
    pub description: String,
    /// Conversation turns
    pub messages: Vec<Message>,
}

impl PromptResult {
    /// Create a prompt result with a description and no messages.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            messages: Vec::new(),
        }
    }

    /// Add a user message.
    #[must_use]
    pub fn add_user(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::user(text));
        self
    }

    /// Add an assistant message.
    #[must_use]
    pub fn add_assistant(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(text));
        self
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if there are no turns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListToolsResult {
    /// Registered tools, in registration order
    pub tools: Vec<Tool>,
    /// Pagination cursor; result sets are single-page so this is always absent
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Result of `resources/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListResourcesResult {
    /// Registered resources, in registration order
    pub resources: Vec<Resource>,
    /// Pagination cursor, always absent
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Result of `prompts/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListPromptsResult {
    /// Registered prompts, in registration order
    pub prompts: Vec<Prompt>,
    /// Pagination cursor, always absent
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
