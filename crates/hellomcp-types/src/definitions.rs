//! Capability descriptors.
//!
//! Declarative metadata for everything the server advertises:
//! - `Tool` - callable capability with an input schema
//! - `Resource` - URI-addressed readable item
//! - `Prompt` - parameterized template with declared arguments
//! - `ServerInfo` - server identification and version
//!
//! Descriptors are built once during registration and never mutated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server information returned from `initialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    /// Server name (machine-readable identifier)
    pub name: String,
    /// Server version
    pub version: String,
}

impl ServerInfo {
    /// Create server info with name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Tool definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Tool name, the dispatch key for `tools/call`
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

impl Tool {
    /// Create a new tool with name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: ToolInputSchema::default(),
        }
    }

    /// Set the input schema.
    #[must_use]
    pub fn with_schema(mut self, schema: ToolInputSchema) -> Self {
        self.input_schema = schema;
        self
    }

    /// Names of arguments the tool declares mandatory.
    #[must_use]
    pub fn required_arguments(&self) -> &[String] {
        self.input_schema.required.as_deref().unwrap_or_default()
    }
}

/// JSON Schema for tool input parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInputSchema {
    /// Schema type (always "object" for tools)
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions, in declaration order
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".into(),
            properties: Map::new(),
            required: None,
        }
    }
}

impl ToolInputSchema {
    /// Create an empty object schema.
    #[must_use]
    pub fn object() -> Self {
        Self::default()
    }

    /// Add an optional property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema.into_value());
        self
    }

    /// Add a property and mark it required.
    #[must_use]
    pub fn required_property(self, name: impl Into<String>, schema: PropertySchema) -> Self {
        let name = name.into();
        let mut this = self.property(name.clone(), schema);
        this.required.get_or_insert_with(Vec::new).push(name);
        this
    }
}

/// A single node in an input schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    schema_type: String,
    description: Option<String>,
    properties: Vec<(String, PropertySchema)>,
}

impl PropertySchema {
    /// Property of the given JSON type.
    #[must_use]
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: schema_type.into(),
            description: None,
            properties: Vec::new(),
        }
    }

    /// String property with a description.
    #[must_use]
    pub fn string(description: impl Into<String>) -> Self {
        Self::of_type("string").describe(description)
    }

    /// Number property with a description.
    #[must_use]
    pub fn number(description: impl Into<String>) -> Self {
        Self::of_type("number").describe(description)
    }

    /// Boolean property with a description.
    #[must_use]
    pub fn boolean(description: impl Into<String>) -> Self {
        Self::of_type("boolean").describe(description)
    }

    /// Set the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a nested property (object schemas).
    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    fn into_value(self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), Value::String(self.schema_type));
        if let Some(description) = self.description {
            node.insert("description".into(), Value::String(description));
        }
        if !self.properties.is_empty() {
            let nested = self
                .properties
                .into_iter()
                .map(|(name, schema)| (name, schema.into_value()))
                .collect();
            node.insert("properties".into(), Value::Object(nested));
        }
        Value::Object(node)
    }
}

/// Resource definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// Resource name
    pub name: String,
    /// Resource URI, the dispatch key for `resources/read`
    pub uri: String,
    /// Resource description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource content
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Resource {
    /// Create a new resource with name and URI.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Prompt definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    /// Prompt name, the dispatch key for `prompts/get`
    pub name: String,
    /// Prompt description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Prompt arguments, in declaration order
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
}

impl Prompt {
    /// Create a new prompt with name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            arguments: Vec::new(),
        }
    }

    /// Declare an argument.
    #[must_use]
    pub fn with_argument(mut self, argument: PromptArgument) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Prompt argument definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromptArgument {
    /// Argument name
    pub name: String,
    /// Argument description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the argument must be supplied
    #[serde(default)]
    pub required: bool,
}

impl PromptArgument {
    /// An optional argument.
    #[must_use]
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            required: false,
        }
    }

    /// A required argument.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(name, description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tool_schema_serialization() {
        let tool = Tool::new("calculator", "Perform calculations").with_schema(
            ToolInputSchema::object().required_property(
                "expression",
                PropertySchema::string("Mathematical expression to evaluate"),
            ),
        );

        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "calculator",
                "description": "Perform calculations",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "expression": {
                            "type": "string",
                            "description": "Mathematical expression to evaluate"
                        }
                    },
                    "required": ["expression"]
                }
            })
        );
        assert_eq!(tool.required_arguments(), ["expression".to_string()]);
    }

    #[test]
    fn test_nested_property_schema() {
        let schema = ToolInputSchema::object().property(
            "location",
            PropertySchema::of_type("object")
                .describe("Where")
                .nested("city", PropertySchema::string("City name")),
        );
        assert_eq!(
            schema.properties["location"]["properties"]["city"]["type"],
            "string"
        );
        assert!(schema.required.is_none());
    }

    #[test]
    fn test_property_order_is_preserved() {
        let schema = ToolInputSchema::object()
            .property("zeta", PropertySchema::string("z"))
            .property("alpha", PropertySchema::string("a"));
        let keys: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_resource_wire_names() {
        let resource = Resource::new("System Status", "resource://system/status")
            .with_mime_type("application/json");
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["mimeType"], "application/json");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_prompt_arguments() {
        let prompt = Prompt::new("interview", "Mock interview")
            .with_argument(PromptArgument::required("position", "Role"))
            .with_argument(PromptArgument::optional("company", "Employer"));
        assert!(prompt.arguments[0].required);
        assert!(!prompt.arguments[1].required);
    }
}
