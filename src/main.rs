//! Toolgate server - main entry point.
//!
//! Builds the tool manager around the built-in local tool set, optionally
//! wires up remote tool loading, and serves the stdio command loop.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use toolgate::manager::ToolManager;
use toolgate::stdio::StdioServer;
use toolgate::tools::builtin_tools;
use toolgate::types::{Config, RemoteApiConfig, ToolConfigFile};

#[derive(Parser, Debug)]
#[command(name = "toolgate", version, about = "Tool-calling gateway over stdio")]
struct Args {
    /// Enable loading tools from a remote registry endpoint.
    #[arg(long, env = "TOOLGATE_REMOTE_ENABLED", default_value_t = false)]
    remote_enabled: bool,

    /// Remote endpoint returning {"tools": [...]} on GET.
    #[arg(long, env = "TOOLGATE_REMOTE_TOOLS_URL")]
    remote_tools_url: Option<String>,

    /// Per-request timeout for registry fetches, in milliseconds.
    #[arg(long, env = "TOOLGATE_REMOTE_TIMEOUT_MS", default_value_t = 5000)]
    remote_timeout_ms: u64,

    /// Bounded number of registry fetch attempts.
    #[arg(long, env = "TOOLGATE_REMOTE_RETRY_ATTEMPTS", default_value_t = 3)]
    remote_retry_attempts: u32,

    /// Fixed delay between fetch attempts, in milliseconds.
    #[arg(long, env = "TOOLGATE_REMOTE_RETRY_DELAY_MS", default_value_t = 1000)]
    remote_retry_delay_ms: u64,

    /// Path of the persisted per-tool enable/disable state.
    #[arg(long, env = "TOOLGATE_TOOL_CONFIG", default_value = "tool-config.json")]
    tool_config: PathBuf,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            remote: RemoteApiConfig {
                enabled: self.remote_enabled,
                tools_url: self.remote_tools_url,
                timeout: Duration::from_millis(self.remote_timeout_ms),
                retry_attempts: self.remote_retry_attempts,
                retry_delay: Duration::from_millis(self.remote_retry_delay_ms),
            },
            tool_config: ToolConfigFile {
                path: self.tool_config,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr; stdout is the protocol channel.
    toolgate::observability::init_tracing();

    let config = args.into_config();
    let manager = Arc::new(ToolManager::with_local_tools(builtin_tools(), config));
    manager.initialize().await?;

    tracing::info!("toolgate serving on stdio");
    StdioServer::new(manager).serve().await?;

    Ok(())
}
