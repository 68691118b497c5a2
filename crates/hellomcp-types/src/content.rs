//! Content blocks and prompt message turns.
//!
//! - [`Content`]: used in `CallToolResult.content` and prompt messages.
//!   Text is the only block kind this server produces.
//! - [`Message`]: a role-tagged turn in a `GetPromptResult`.

use serde::{Deserialize, Serialize};

/// Role in a prompt message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role (human or client)
    #[default]
    User,
    /// Assistant role (model)
    Assistant,
}

/// Content block in tool results and prompt messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Text content
    #[serde(rename = "text")]
    Text(TextContent),
}

/// Text content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text
    pub text: String,
}

impl Default for Content {
    fn default() -> Self {
        Self::text("")
    }
}

impl Content {
    /// Create text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextContent { text: text.into() })
    }

    /// Check if this is text content.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Get the text if this is text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.text),
        }
    }
}

/// A message in a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of this message (user or assistant)
    pub role: Role,
    /// The content of this message
    pub content: Content,
}

impl Message {
    /// Create a new message.
    #[must_use]
    pub fn new(role: Role, content: Content) -> Self {
        Self { role, content }
    }

    /// Create a user message with text content.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, Content::text(text))
    }

    /// Create an assistant message with text content.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Content::text(text))
    }

    /// Text of this message, if it is a text block.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_text() {
        let content = Content::text("Hello");
        assert!(content.is_text());
        assert_eq!(content.as_text(), Some("Hello"));
    }

    #[test]
    fn test_content_wire_shape() {
        let value = serde_json::to_value(Content::text("Unknown tool")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "Unknown tool"}));
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let value = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"]["text"], "hi");
        assert_eq!(Message::user("x").role, Role::User);
    }
}
