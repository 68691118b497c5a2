//! Capability registry.
//!
//! Holds the tools, resources, and prompts the server exposes, each keyed by
//! name (URI for resources). Listings come back in registration order. The
//! registry is sealed when the server starts; from then on it is read-only.

use std::fmt;
use std::sync::Arc;

use hellomcp_types::{Prompt, Resource, Tool};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::RegistryError;
use crate::handler::{PromptHandler, ResourceHandler, ToolHandler};

/// A registered tool: descriptor plus implementation.
#[derive(Clone)]
pub struct RegisteredTool {
    /// Descriptor advertised by `tools/list`
    pub descriptor: Tool,
    /// Implementation invoked by `tools/call`
    pub handler: Arc<dyn ToolHandler>,
}

/// A registered resource: descriptor plus implementation.
#[derive(Clone)]
pub struct RegisteredResource {
    /// Descriptor advertised by `resources/list`
    pub descriptor: Resource,
    /// Implementation invoked by `resources/read`
    pub handler: Arc<dyn ResourceHandler>,
}

/// A registered prompt: descriptor plus implementation.
#[derive(Clone)]
pub struct RegisteredPrompt {
    /// Descriptor advertised by `prompts/list`
    pub descriptor: Prompt,
    /// Implementation invoked by `prompts/get`
    pub handler: Arc<dyn PromptHandler>,
}

#[derive(Default)]
struct Entries {
    tools: Vec<RegisteredTool>,
    resources: Vec<RegisteredResource>,
    prompts: Vec<RegisteredPrompt>,
    sealed: bool,
}

impl Entries {
    fn check(&self, kind: &'static str, key: &str, taken: bool) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed {
                kind,
                key: key.to_string(),
            });
        }
        if taken {
            return Err(RegistryError::Duplicate {
                kind,
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

/// Ordered, keyed store of the server's capabilities.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: RwLock<Entries>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its descriptor's name.
    pub fn register_tool(
        &self,
        descriptor: Tool,
        handler: impl ToolHandler + 'static,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        let taken = entries.tools.iter().any(|t| t.descriptor.name == descriptor.name);
        entries.check("tool", &descriptor.name, taken)?;
        debug!(tool = %descriptor.name, "Registered tool");
        entries.tools.push(RegisteredTool {
            descriptor,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Register a resource under its descriptor's URI.
    pub fn register_resource(
        &self,
        descriptor: Resource,
        handler: impl ResourceHandler + 'static,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        let taken = entries
            .resources
            .iter()
            .any(|r| r.descriptor.uri == descriptor.uri);
        entries.check("resource", &descriptor.uri, taken)?;
        debug!(uri = %descriptor.uri, "Registered resource");
        entries.resources.push(RegisteredResource {
            descriptor,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Register a prompt under its descriptor's name.
    pub fn register_prompt(
        &self,
        descriptor: Prompt,
        handler: impl PromptHandler + 'static,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        let taken = entries
            .prompts
            .iter()
            .any(|p| p.descriptor.name == descriptor.name);
        entries.check("prompt", &descriptor.name, taken)?;
        debug!(prompt = %descriptor.name, "Registered prompt");
        entries.prompts.push(RegisteredPrompt {
            descriptor,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Tool descriptors in registration order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.entries
            .read()
            .tools
            .iter()
            .map(|t| t.descriptor.clone())
            .collect()
    }

    /// Resource descriptors in registration order.
    #[must_use]
    pub fn list_resources(&self) -> Vec<Resource> {
        self.entries
            .read()
            .resources
            .iter()
            .map(|r| r.descriptor.clone())
            .collect()
    }

    /// Prompt descriptors in registration order.
    #[must_use]
    pub fn list_prompts(&self) -> Vec<Prompt> {
        self.entries
            .read()
            .prompts
            .iter()
            .map(|p| p.descriptor.clone())
            .collect()
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<RegisteredTool> {
        self.entries
            .read()
            .tools
            .iter()
            .find(|t| t.descriptor.name == name)
            .cloned()
    }

    /// Look up a resource by exact URI.
    #[must_use]
    pub fn resource(&self, uri: &str) -> Option<RegisteredResource> {
        self.entries
            .read()
            .resources
            .iter()
            .find(|r| r.descriptor.uri == uri)
            .cloned()
    }

    /// Look up a prompt by name.
    #[must_use]
    pub fn prompt(&self, name: &str) -> Option<RegisteredPrompt> {
        self.entries
            .read()
            .prompts
            .iter()
            .find(|p| p.descriptor.name == name)
            .cloned()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.entries.read().tools.len()
    }

    /// Number of registered resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.entries.read().resources.len()
    }

    /// Number of registered prompts.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.entries.read().prompts.len()
    }

    /// Refuse further registrations.
    pub fn seal(&self) {
        self.entries.write().sealed = true;
    }

    /// Whether registrations are still accepted.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.entries.read().sealed
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_struct("CapabilityRegistry")
            .field("tools", &entries.tools.len())
            .field("resources", &entries.resources.len())
            .field("prompts", &entries.prompts.len())
            .field("sealed", &entries.sealed)
            .finish()
    }
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisteredResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredResource")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisteredPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredPrompt")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{prompt_fn, resource_fn, tool_fn, ToolError};
    use hellomcp_types::{Arguments, PromptResult, ResourceResult, ToolResult};
    use proptest::prelude::*;

    fn noop_tool() -> impl ToolHandler {
        tool_fn(|_args: Arguments| async { Ok::<_, ToolError>(ToolResult::text("ok")) })
    }

    #[test]
    fn test_duplicate_tool_rejected() {
        let registry = CapabilityRegistry::new();
        registry
            .register_tool(Tool::new("weather", "first"), noop_tool())
            .unwrap();
        let err = registry
            .register_tool(Tool::new("weather", "second"), noop_tool())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                kind: "tool",
                key: "weather".into()
            }
        );
        assert_eq!(registry.tool_count(), 1);
        assert_eq!(registry.list_tools()[0].description, "first");
    }

    #[test]
    fn test_resources_keyed_by_uri() {
        let registry = CapabilityRegistry::new();
        let handler =
            || resource_fn(|uri: String| async move { Ok(ResourceResult::text(uri, "")) });
        registry
            .register_resource(Resource::new("a", "resource://one"), handler())
            .unwrap();
        registry
            .register_resource(Resource::new("a", "resource://two"), handler())
            .unwrap();
        assert!(registry
            .register_resource(Resource::new("b", "resource://one"), handler())
            .is_err());

        assert!(registry.resource("resource://two").is_some());
        assert!(registry.resource("resource://three").is_none());
    }

    #[test]
    fn test_sealed_registry_rejects_registration() {
        let registry = CapabilityRegistry::new();
        registry.seal();
        let err = registry
            .register_prompt(
                Prompt::new("interview", "Interview"),
                prompt_fn(|_args: Arguments| async { Ok(PromptResult::new("")) }),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::Sealed { kind: "prompt", .. }));
        assert_eq!(registry.prompt_count(), 0);
    }

    proptest! {
        #[test]
        fn listing_preserves_registration_order(
            names in proptest::collection::hash_set("[a-z]{1,12}", 0..16)
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let registry = CapabilityRegistry::new();
            for name in &names {
                registry.register_tool(Tool::new(name.clone(), ""), noop_tool()).unwrap();
            }

            let listed: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();
            prop_assert_eq!(listed, names);
        }
    }
}
