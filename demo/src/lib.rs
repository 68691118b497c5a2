//! # HelloMCP demo capabilities
//!
//! The tools, resources, and prompt served by the `hellomcp` binary. Each
//! capability talks to its backend through a trait, so the bundled
//! placeholder backends can be swapped out in [`Backends`].

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

use std::fmt;
use std::sync::Arc;

use hellomcp_server::{RegistryError, Server};
use tracing::info;

pub mod prompts;
pub mod resources;
pub mod tools;

use prompts::InterviewPrompt;
use resources::{KnowledgeBase, SystemStatus};
use tools::{
    CalculatorTool, ChatTool, Evaluator, FixedWeather, LanguageModel, NoModel,
    PlaceholderEvaluator, WeatherSource, WeatherTool,
};

/// Backends the demo capabilities delegate to.
#[derive(Clone)]
pub struct Backends {
    /// Weather observations
    pub weather: Arc<dyn WeatherSource>,
    /// Expression evaluation
    pub evaluator: Arc<dyn Evaluator>,
    /// Text generation; also probed by the status resource
    pub model: Arc<dyn LanguageModel>,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            weather: Arc::new(FixedWeather),
            evaluator: Arc::new(PlaceholderEvaluator),
            model: Arc::new(NoModel),
        }
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}

/// Register every demo capability on `server`.
///
/// # Errors
///
/// Fails if the server has already started or a capability is already
/// registered.
pub fn register_all(server: &Server, backends: &Backends) -> Result<(), RegistryError> {
    server.register_tool(
        ChatTool::descriptor(),
        ChatTool::new(Arc::clone(&backends.model)),
    )?;
    server.register_tool(
        WeatherTool::descriptor(),
        WeatherTool::new(Arc::clone(&backends.weather)),
    )?;
    server.register_tool(
        CalculatorTool::descriptor(),
        CalculatorTool::new(Arc::clone(&backends.evaluator)),
    )?;

    server.register_resource(KnowledgeBase::descriptor(), KnowledgeBase)?;
    server.register_resource(
        SystemStatus::descriptor(),
        SystemStatus::new(Arc::clone(&backends.model)),
    )?;

    server.register_prompt(InterviewPrompt::descriptor(), InterviewPrompt)?;

    let registry = server.registry();
    info!(
        tools = registry.tool_count(),
        resources = registry.resource_count(),
        prompts = registry.prompt_count(),
        "Registered demo capabilities"
    );
    Ok(())
}
