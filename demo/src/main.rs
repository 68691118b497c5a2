//! `hellomcp`: MCP server over stdio.
//!
//! Stdout carries protocol messages only. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use hellomcp_demo::{Backends, register_all};
use hellomcp_server::{McpService, Server, ServerConfig, ServiceGroup, Signal};
use tracing::{error, info};

/// How long runtime teardown waits for blocking tasks (the stdin reader).
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "hellomcp", version, about = "HelloMCP server over stdio")]
struct Cli {
    /// Configuration file (.toml, .yaml, .yml, or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "hellomcp_server=debug"; RUST_LOG wins when set
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ServerConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.json_logs {
            config.logging.structured = true;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Server exited with an error");
            eprintln!("hellomcp: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    config
        .logging
        .init()
        .context("failed to initialize logging")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the async runtime")?;
    let outcome = runtime.block_on(serve(config));
    // Stdin reads block a runtime thread; don't wait on them indefinitely.
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    outcome
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let server = Arc::new(Server::new(config));
    register_all(&server, &Backends::default()).context("failed to register capabilities")?;

    info!(name = %server.info().name, version = %server.info().version, "Serving on stdio");
    ServiceGroup::new()
        .with_service(McpService::stdio(server))
        .with_graceful_shutdown_signals([Signal::Terminate, Signal::Interrupt])
        .run()
        .await?;

    info!("Shutdown complete");
    Ok(())
}
