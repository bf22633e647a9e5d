//! Tool catalog: one generic API tool per configured source.

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::Tool;

use super::params::ApiToolParams;
use crate::domains::sources::SourceConfig;

/// Build the tool definitions advertised for `sources`, in source order.
pub fn create_tools(sources: &[SourceConfig], guide_excerpt_chars: usize) -> Vec<Tool> {
    sources
        .iter()
        .map(|source| to_tool(source, guide_excerpt_chars))
        .collect()
}

/// Tool definition for a single source.
pub fn to_tool(source: &SourceConfig, guide_excerpt_chars: usize) -> Tool {
    Tool {
        name: source.tool_name().into(),
        description: Some(describe(source, guide_excerpt_chars).into()),
        input_schema: cached_schema_for_type::<ApiToolParams>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: Some(source.name.clone()),
    }
}

/// Human-readable description: name, base URL, auth note, then the guide excerpt.
pub fn describe(source: &SourceConfig, guide_excerpt_chars: usize) -> String {
    let mut description = format!(
        "Make requests to the {} API ({}). \
         Authentication is handled automatically; just provide the path, method and params.",
        source.name, source.base_url
    );

    if let Some(guide) = source.guide_raw.as_deref().filter(|g| !g.trim().is_empty()) {
        description.push_str("\n\n## API Guide\n\n");
        match guide.char_indices().nth(guide_excerpt_chars) {
            Some((cut, _)) => {
                description.push_str(&guide[..cut]);
                description.push_str("\n\n[Guide truncated]");
            }
            None => description.push_str(guide),
        }
    }

    description
}
