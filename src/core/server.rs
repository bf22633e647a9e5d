//! MCP Server implementation and lifecycle management.
//!
//! `McpServer` implements the rmcp `ServerHandler` and exposes one API tool
//! per configured source. Tool listing and invocation go through the shared
//! `ToolRegistry`, for both the rmcp router (STDIO) and the HTTP transport.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::*,
    service::RequestContext,
};
use std::sync::Arc;
use tracing::info;

use super::config::{Config, DEFAULT_WORKSPACE_ID};
use super::error::{self, Error};
use crate::domains::credentials::{CredentialReader, FileCredentialStore};
use crate::domains::sources::SourcesDocument;
use crate::domains::tools::{
    ToolError, ToolExecutor, ToolRegistry, build_tool_router, error_result,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Configured sources and the executor serving them.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server reading credentials from the configured credential cache.
    pub fn new(config: Config, document: SourcesDocument) -> error::Result<Self> {
        let credentials = Arc::new(FileCredentialStore::new(
            config.bridge.credentials_dir.clone(),
        ));
        Self::with_credentials(config, document, credentials)
    }

    /// Create a server with an explicit credential reader.
    pub fn with_credentials(
        config: Config,
        document: SourcesDocument,
        credentials: Arc<dyn CredentialReader>,
    ) -> error::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", config.server.name, config.server.version))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        let workspace_id = config
            .bridge
            .workspace_id
            .clone()
            .or(document.workspace_id)
            .unwrap_or_else(|| DEFAULT_WORKSPACE_ID.to_string());
        info!("Using workspace '{}' for credential lookup", workspace_id);

        let executor = ToolExecutor::new(client, credentials, workspace_id)
            .with_session_path(config.bridge.session_path.clone())
            .with_limits(config.limits);
        let registry = Arc::new(ToolRegistry::new(document.sources, executor));

        Ok(Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// List all available tools as `{ name, description, inputSchema }` objects.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name and return the tool result as JSON.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> serde_json::Value {
        let result = self.registry.call_tool(name, arguments).await;
        serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        })
    }
}

/// Tools-only ServerHandler. Unknown tool names become an error tool result
/// rather than a protocol error, on every transport.
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "This server proxies {} configured REST API(s). Each tool takes a path, \
                 an HTTP method and optional params; authentication is applied automatically.",
                self.registry.tool_names().len()
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(&request.name) {
            return Ok(error_result(ToolError::not_found(request.name.to_string())));
        }
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            meta: None,
            next_cursor: None,
        })
    }
}
