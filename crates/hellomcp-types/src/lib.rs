//! # HelloMCP Types
//!
//! The protocol data model shared by the server core and capability
//! implementations:
//!
//! - **Descriptors**: `Tool`, `Resource`, `Prompt`, `ServerInfo`
//! - **Results**: `ToolResult`, `ResourceResult`, `PromptResult`, list results
//! - **Content**: `Content`, `Message`, `Role`
//! - **Arguments**: `Arguments`, `ArgValue` with total accessors
//! - **Protocol**: JSON-RPC envelopes and typed `MethodSpec` markers
//! - **Errors**: the protocol-level `McpError`
//!
//! ```rust
//! use hellomcp_types::*;
//!
//! let tool = Tool::new("weather", "Get current weather for a location").with_schema(
//!     ToolInputSchema::object()
//!         .property("location", PropertySchema::string("City name or coordinates")),
//! );
//! assert_eq!(tool.name, "weather");
//!
//! let prompt = PromptResult::new("A greeting").add_user("Hello!");
//! assert_eq!(prompt.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod arguments;
pub mod content;
pub mod definitions;
pub mod error;
pub mod protocol;
pub mod results;

pub use arguments::*;
pub use content::*;
pub use definitions::*;
pub use error::{ErrorKind, McpError, McpResult};
pub use results::*;
