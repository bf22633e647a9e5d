//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! One dynamic route per configured source. Every route forwards to the
//! shared registry, which owns the executor.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::Tool,
};

use super::params::ApiToolParams;
use super::registry::ToolRegistry;

/// Build the tool router with one route per source in `registry`.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .list_tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            router.with_route(create_route(tool, registry.clone()))
        })
}

fn create_route<S>(tool: Tool, registry: Arc<ToolRegistry>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let tool_name = tool.name.to_string();
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let registry = registry.clone();
        let tool_name = tool_name.clone();
        async move {
            let params: ApiToolParams = serde_json::from_value(serde_json::Value::Object(args))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

            Ok(registry.execute(&tool_name, &params).await)
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::credentials::StaticCredentials;
    use crate::domains::sources::SourceConfig;
    use crate::domains::tools::ToolExecutor;

    struct TestServer {}

    fn test_registry() -> Arc<ToolRegistry> {
        let executor = ToolExecutor::new(
            reqwest::Client::new(),
            Arc::new(StaticCredentials::empty()),
            "ws",
        );
        Arc::new(ToolRegistry::new(
            vec![
                SourceConfig::new("github", "GitHub", "https://api.github.com"),
                SourceConfig::new("stripe", "Stripe", "https://api.stripe.com"),
                SourceConfig::new("linear", "Linear", "https://api.linear.app"),
            ],
            executor,
        ))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_registry());
        let tools = router.list_all();
        assert_eq!(tools.len(), 3);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"api_github"));
        assert!(names.contains(&"api_stripe"));
        assert!(names.contains(&"api_linear"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = test_registry();
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in &registry_names {
            assert!(router_names.contains(&name.as_str()));
        }
    }
}
