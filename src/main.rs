//! API bridge entry point.
//!
//! Initializes logging, loads the source document named by
//! `MCP_SOURCES_CONFIG` and serves the generated tools on the configured
//! transport.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use api_bridge_mcp::core::{Config, McpServer, TransportService};
use api_bridge_mcp::domains::sources::SourcesDocument;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let sources_path = config
        .bridge
        .sources_path
        .clone()
        .context("MCP_SOURCES_CONFIG must point to the source configuration file")?;
    let document = SourcesDocument::load(&sources_path)
        .with_context(|| format!("failed to load sources from {}", sources_path.display()))?;

    match &config.bridge.session_path {
        Some(path) => info!("Session directory: {}", path.display()),
        None => info!("No session directory configured; large responses stay inline"),
    }

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, document)?;

    info!("Server initialized");

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem on stderr.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
