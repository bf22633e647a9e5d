//! Tool Registry - maps tool names to sources and dispatches calls.
//!
//! Tool names are resolved through a lookup table built once at startup.
//! A call is a function of (name, arguments, table) only.

use std::collections::HashMap;

use rmcp::model::{CallToolResult, Tool};
use tracing::{info, warn};

use super::catalog;
use super::error::ToolError;
use super::executor::{ToolExecutor, error_result};
use super::params::ApiToolParams;
use crate::domains::sources::SourceConfig;

/// Tool registry - the configured sources and the executor that serves them.
pub struct ToolRegistry {
    sources: Vec<SourceConfig>,
    by_tool_name: HashMap<String, usize>,
    executor: ToolExecutor,
}

impl ToolRegistry {
    /// Create a registry over `sources`.
    pub fn new(sources: Vec<SourceConfig>, executor: ToolExecutor) -> Self {
        let by_tool_name = sources
            .iter()
            .enumerate()
            .map(|(index, source)| (source.tool_name(), index))
            .collect();

        Self {
            sources,
            by_tool_name,
            executor,
        }
    }

    /// Get all tool names, in source order.
    pub fn tool_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.tool_name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both the HTTP and STDIO transports list tools from here.
    pub fn list_tools(&self) -> Vec<Tool> {
        catalog::create_tools(&self.sources, self.executor.limits().guide_excerpt_chars)
    }

    /// Source behind a tool name.
    pub fn source(&self, tool_name: &str) -> Option<&SourceConfig> {
        self.by_tool_name
            .get(tool_name)
            .and_then(|&index| self.sources.get(index))
    }

    /// Call a tool with already-parsed arguments.
    pub async fn execute(&self, tool_name: &str, args: &ApiToolParams) -> CallToolResult {
        let Some(source) = self.source(tool_name) else {
            warn!("Unknown tool requested: {}", tool_name);
            return error_result(ToolError::not_found(tool_name));
        };

        info!("Calling {} {} {}", tool_name, args.method, args.path);
        self.executor.execute(source, args).await
    }

    /// Call a tool with raw JSON arguments.
    ///
    /// Unknown names and malformed arguments yield error results without
    /// touching the network.
    pub async fn call_tool(&self, tool_name: &str, arguments: serde_json::Value) -> CallToolResult {
        if self.source(tool_name).is_none() {
            warn!("Unknown tool requested: {}", tool_name);
            return error_result(ToolError::not_found(tool_name));
        }

        match serde_json::from_value::<ApiToolParams>(arguments) {
            Ok(args) => self.execute(tool_name, &args).await,
            Err(e) => error_result(ToolError::invalid_arguments(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::credentials::StaticCredentials;
    use std::sync::Arc;
    use rmcp::model::RawContent;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn registry(base_url: &str) -> ToolRegistry {
        let executor = ToolExecutor::new(
            reqwest::Client::new(),
            Arc::new(StaticCredentials::empty()),
            "ws",
        );
        ToolRegistry::new(
            vec![
                SourceConfig::new("alpha", "Alpha", base_url),
                SourceConfig::new("beta", "Beta", base_url),
            ],
            executor,
        )
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = registry("https://example.test");
        assert_eq!(registry.tool_names(), vec!["api_alpha", "api_beta"]);
        assert_eq!(registry.list_tools().len(), 2);
    }

    #[test]
    fn test_source_lookup() {
        let registry = registry("https://example.test");
        assert_eq!(registry.source("api_beta").unwrap().slug, "beta");
        assert!(registry.source("beta").is_none());
    }

    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = registry("https://example.test");
        let result = registry
            .call_tool("api_gamma", serde_json::json!({"path": "/", "method": "GET"}))
            .await;
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "Unknown tool: api_gamma");
    }

    #[tokio::test]
    async fn test_registry_call_invalid_arguments() {
        let registry = registry("https://example.test");
        let result = registry
            .call_tool("api_alpha", serde_json::json!({"method": "GET"}))
            .await;
        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).starts_with("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_registry_dispatches_to_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string("world"))
            .expect(1)
            .mount(&server)
            .await;

        let registry = registry(&server.uri());
        let result = registry
            .call_tool(
                "api_beta",
                serde_json::json!({"path": "/hello", "method": "GET"}),
            )
            .await;
        assert_eq!(text_of(&result), "world");
    }
}
