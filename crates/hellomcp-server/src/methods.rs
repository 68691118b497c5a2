//! Built-in protocol methods backed by the capability registry.

use std::sync::Arc;

use hellomcp_types::protocol::{
    CallTool, CallToolParams, Empty, GetPrompt, GetPromptParams, Initialize, InitializeParams,
    InitializeResult, Initialized, ListChangedCapability, ListParams, ListPrompts, ListResources,
    ListTools, Ping, ReadResource, ReadResourceParams, SUPPORTED_PROTOCOL_VERSIONS,
    ServerCapabilities,
};
use hellomcp_types::{
    ListPromptsResult, ListResourcesResult, ListToolsResult, McpError, McpResult, PromptResult,
    ResourceResult, ServerInfo, ToolResult,
};
use tracing::{debug, info, warn};

use crate::dispatch::DispatchTable;
use crate::registry::CapabilityRegistry;

/// Text returned for calls to a tool that is not registered.
pub const UNKNOWN_TOOL: &str = "Unknown tool";

/// Install handlers for every built-in method.
pub(crate) fn install(table: &DispatchTable, registry: &Arc<CapabilityRegistry>, info: &ServerInfo) {
    let reg = Arc::clone(registry);
    let server_info = info.clone();
    table.set_handler::<Initialize, _, _>(move |params: InitializeParams| {
        let result = initialize(&reg, &server_info, &params);
        async move { Ok(result) }
    });

    table.set_handler::<Initialized, _, _>(|_: Empty| async {
        debug!("Client finished initialization");
        Ok(Empty {})
    });

    table.set_handler::<Ping, _, _>(|_: Empty| async { Ok(Empty {}) });

    let reg = Arc::clone(registry);
    table.set_handler::<ListTools, _, _>(move |_: ListParams| {
        let tools = reg.list_tools();
        async move {
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
            })
        }
    });

    let reg = Arc::clone(registry);
    table.set_handler::<CallTool, _, _>(move |params: CallToolParams| {
        let reg = Arc::clone(&reg);
        async move { Ok(call_tool(&reg, params).await) }
    });

    let reg = Arc::clone(registry);
    table.set_handler::<ListResources, _, _>(move |_: ListParams| {
        let resources = reg.list_resources();
        async move {
            Ok(ListResourcesResult {
                resources,
                next_cursor: None,
            })
        }
    });

    let reg = Arc::clone(registry);
    table.set_handler::<ReadResource, _, _>(move |params: ReadResourceParams| {
        let reg = Arc::clone(&reg);
        async move { read_resource(&reg, &params.uri).await }
    });

    let reg = Arc::clone(registry);
    table.set_handler::<ListPrompts, _, _>(move |_: ListParams| {
        let prompts = reg.list_prompts();
        async move {
            Ok(ListPromptsResult {
                prompts,
                next_cursor: None,
            })
        }
    });

    let reg = Arc::clone(registry);
    table.set_handler::<GetPrompt, _, _>(move |params: GetPromptParams| {
        let reg = Arc::clone(&reg);
        async move { get_prompt(&reg, params).await }
    });
}

fn initialize(
    registry: &CapabilityRegistry,
    info: &ServerInfo,
    params: &InitializeParams,
) -> InitializeResult {
    let requested = params.protocol_version.as_deref();
    let protocol_version = match requested {
        Some(version) if SUPPORTED_PROTOCOL_VERSIONS.contains(&version) => version,
        Some(version) => {
            warn!(
                requested = version,
                offered = SUPPORTED_PROTOCOL_VERSIONS[0],
                "Unsupported protocol version requested"
            );
            SUPPORTED_PROTOCOL_VERSIONS[0]
        }
        None => SUPPORTED_PROTOCOL_VERSIONS[0],
    };

    if let Some(client) = &params.client_info {
        info!(client = %client.name, client_version = %client.version, protocol_version, "Client connected");
    }

    let advertise = |count: usize| (count > 0).then(ListChangedCapability::default);
    InitializeResult {
        protocol_version: protocol_version.to_string(),
        capabilities: ServerCapabilities {
            tools: advertise(registry.tool_count()),
            resources: advertise(registry.resource_count()),
            prompts: advertise(registry.prompt_count()),
        },
        server_info: info.clone(),
    }
}

async fn call_tool(registry: &CapabilityRegistry, params: CallToolParams) -> ToolResult {
    let Some(tool) = registry.tool(&params.name) else {
        debug!(tool = %params.name, "Call to unknown tool");
        return ToolResult::error(UNKNOWN_TOOL);
    };

    if let Some(missing) = tool
        .descriptor
        .required_arguments()
        .iter()
        .find(|name| !params.arguments.contains(name))
    {
        return ToolResult::error(format!("Missing required argument: {missing}"));
    }

    match tool.handler.call(params.arguments).await {
        Ok(result) => result,
        Err(err) => {
            debug!(tool = %params.name, error = %err, "Tool reported failure");
            ToolResult::error(err.to_string())
        }
    }
}

async fn read_resource(registry: &CapabilityRegistry, uri: &str) -> McpResult<ResourceResult> {
    let resource = registry
        .resource(uri)
        .ok_or_else(|| McpError::invalid_params(format!("Unknown resource URI: {uri}")))?;
    resource.handler.read(uri).await
}

async fn get_prompt(registry: &CapabilityRegistry, params: GetPromptParams) -> McpResult<PromptResult> {
    let prompt = registry
        .prompt(&params.name)
        .ok_or_else(|| McpError::invalid_params(format!("Unknown prompt: {}", params.name)))?;

    if let Some(missing) = prompt
        .descriptor
        .arguments
        .iter()
        .find(|arg| arg.required && !params.arguments.contains(&arg.name))
    {
        return Err(McpError::invalid_params(format!(
            "Missing required argument: {}",
            missing.name
        )));
    }

    prompt.handler.get(params.arguments).await
}
