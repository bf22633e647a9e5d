//! STDIO transport implementation.
//!
//! The MCP host owns stdout; all logging goes to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    /// Serve until the host closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let tool_count = server.registry().tool_names().len();
        info!("Ready - serving {} API tool(s) via stdin/stdout", tool_count);

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
